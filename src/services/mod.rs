pub mod deployment;
pub mod query;
pub mod rate_limiter;
pub mod store;

pub use deployment::{DeploymentEngine, DeploymentError};
pub use query::search_agents;
pub use rate_limiter::{RateLimitDecision, RateLimiterService, DEFAULT_POINTS, DEFAULT_WINDOW};
pub use store::{AgentStore, StoreError};
