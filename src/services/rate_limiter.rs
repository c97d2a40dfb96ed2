//! Rate limiter
//!
//! Fixed-window admission control keyed by an opaque client id. A window
//! admits `points` requests; the first check after the window's reset time
//! starts a fresh one. Counters reset at the boundary, so a client can spend
//! one window's budget at its end and the next window's budget immediately
//! after. Sliding-window smoothing is out of contract here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Requests admitted per window unless configured otherwise
pub const DEFAULT_POINTS: u32 = 60;
/// Window length unless configured otherwise
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Per-client fixed-window state
#[derive(Debug, Clone)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: DateTime<Utc>,
    /// Window length this record was created under. Lazy cleanup keeps a
    /// record for one extra window past its reset before dropping it.
    window: Duration,
}

/// Outcome of an admission check. Rejection is a normal result, not an
/// error; the transport layer is expected to surface `remaining` and
/// `reset_at` as response headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    pub success: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
    /// How long a rejected caller should wait before retrying
    pub retry_after: Option<Duration>,
}

/// Fixed-window rate limiter shared across the registry
#[derive(Debug, Clone)]
pub struct RateLimiterService {
    points: u32,
    window: Duration,
    records: Arc<RwLock<HashMap<String, RateLimitRecord>>>,
}

impl Default for RateLimiterService {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS, DEFAULT_WINDOW)
    }
}

impl RateLimiterService {
    pub fn new(points: u32, window: Duration) -> Self {
        Self {
            points,
            window,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Admission check against the service-wide limits
    pub async fn check(&self, client_id: &str) -> RateLimitDecision {
        self.check_with(client_id, self.points, self.window).await
    }

    /// Admission check with per-call limits
    ///
    /// Counts the request against the client's current window unless the
    /// window is already exhausted. A record whose window has elapsed is
    /// reset before counting, never left stale.
    pub async fn check_with(
        &self,
        client_id: &str,
        points: u32,
        window: Duration,
    ) -> RateLimitDecision {
        let now = Utc::now();
        let window_span = chrono::Duration::milliseconds(window.as_millis() as i64);

        let mut records = self.records.write().await;

        // Lazy cleanup: a record expired for more than one full window is
        // dead weight from a client that stopped calling
        records.retain(|_, record| {
            let grace = chrono::Duration::milliseconds(record.window.as_millis() as i64);
            record.window_reset_at + grace >= now
        });

        let record = records
            .entry(client_id.to_string())
            .or_insert_with(|| RateLimitRecord {
                count: 0,
                window_reset_at: now + window_span,
                window,
            });

        if record.window_reset_at <= now {
            record.count = 0;
            record.window_reset_at = now + window_span;
            record.window = window;
        }

        if record.count >= points {
            let retry_after = (record.window_reset_at - now).to_std().unwrap_or_default();
            debug!(client_id = %client_id, reset_at = %record.window_reset_at, "rate limit exceeded");
            return RateLimitDecision {
                success: false,
                limit: points,
                remaining: 0,
                reset_at: record.window_reset_at,
                retry_after: Some(retry_after),
            };
        }

        record.count += 1;
        RateLimitDecision {
            success: true,
            limit: points,
            remaining: points - record.count,
            reset_at: record.window_reset_at,
            retry_after: None,
        }
    }

    /// Number of clients currently tracked, after the cleanup sweep
    pub async fn tracked_clients(&self) -> usize {
        self.records.read().await.len()
    }

    /// Clear all rate limit state (useful for testing)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_down_remaining_then_rejects() {
        let limiter = RateLimiterService::new(3, Duration::from_secs(60));

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check("client-a").await;
            assert!(decision.success);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.limit, 3);
            assert!(decision.retry_after.is_none());
        }

        let decision = limiter.check("client-a").await;
        assert!(!decision.success);
        assert_eq!(decision.remaining, 0);
        let retry_after = decision.retry_after.unwrap();
        assert!(retry_after > Duration::ZERO);
        assert!(retry_after <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn window_elapse_resets_the_counter() {
        let limiter = RateLimiterService::new(2, Duration::from_millis(40));

        assert!(limiter.check("client-a").await.success);
        assert!(limiter.check("client-a").await.success);
        assert!(!limiter.check("client-a").await.success);

        tokio::time::sleep(Duration::from_millis(60)).await;

        let decision = limiter.check("client-a").await;
        assert!(decision.success);
        assert_eq!(decision.remaining, 1);
    }

    #[tokio::test]
    async fn clients_are_independent() {
        let limiter = RateLimiterService::new(1, Duration::from_secs(60));

        assert!(limiter.check("client-a").await.success);
        assert!(!limiter.check("client-a").await.success);

        assert!(limiter.check("client-b").await.success);
    }

    #[tokio::test]
    async fn per_call_limits_override_service_defaults() {
        let limiter = RateLimiterService::new(100, Duration::from_secs(60));

        assert!(
            limiter
                .check_with("client-a", 1, Duration::from_secs(60))
                .await
                .success
        );
        assert!(
            !limiter
                .check_with("client-a", 1, Duration::from_secs(60))
                .await
                .success
        );
    }

    #[tokio::test]
    async fn long_expired_records_are_swept() {
        let limiter = RateLimiterService::new(5, Duration::from_millis(20));

        limiter.check("stale-client").await;
        // Wait out the window plus the one-window grace period
        tokio::time::sleep(Duration::from_millis(70)).await;

        limiter.check("fresh-client").await;
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn reset_at_is_in_the_future_for_admitted_calls() {
        let limiter = RateLimiterService::new(3, Duration::from_secs(60));
        let before = Utc::now();

        let decision = limiter.check("client-a").await;
        assert!(decision.reset_at > before);
    }
}
