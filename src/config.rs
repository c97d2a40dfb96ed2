use std::env;
use std::time::Duration;

/// Registry configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Simulated time between a deployment entering `deploying` and
    /// reaching `running` (default: 2000 ms)
    pub completion_delay: Duration,
    /// Requests admitted per client within one rate-limit window
    /// (default: 60)
    pub rate_limit_points: u32,
    /// Rate-limit window length (default: 60000 ms)
    pub rate_limit_window: Duration,
    /// Page size applied when a listing query does not specify one
    /// (default: 20)
    pub default_page_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            completion_delay: Duration::from_millis(2_000),
            rate_limit_points: 60,
            rate_limit_window: Duration::from_millis(60_000),
            default_page_size: 20,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let completion_delay_ms: u64 = env::var("DEPLOY_COMPLETION_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DEPLOY_COMPLETION_MS"))?;

        let rate_limit_points = env::var("RATE_LIMIT_POINTS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("RATE_LIMIT_POINTS"))?;

        let rate_limit_window_ms: u64 = env::var("RATE_LIMIT_WINDOW_MS")
            .unwrap_or_else(|_| "60000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("RATE_LIMIT_WINDOW_MS"))?;

        let default_page_size = env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_PAGE_SIZE"))?;

        Ok(Self {
            completion_delay: Duration::from_millis(completion_delay_ms),
            rate_limit_points,
            rate_limit_window: Duration::from_millis(rate_limit_window_ms),
            default_page_size,
        })
    }

    /// Configuration with a custom completion delay (for testing)
    pub fn with_completion_delay(completion_delay: Duration) -> Self {
        Self {
            completion_delay,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
