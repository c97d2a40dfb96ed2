pub mod agent;
pub mod deployment;
pub mod query;

pub use agent::*;
pub use deployment::*;
pub use query::*;
