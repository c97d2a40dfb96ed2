//! AgentForge - backend core for the AgentForge agent platform
//!
//! This library provides the in-memory agent registry: catalog CRUD with
//! validation, search and pagination, a simulated deployment lifecycle, and
//! fixed-window rate limiting for callers fronting the registry.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod seed;
pub mod services;

pub use config::{ConfigError, RegistryConfig};
pub use error::Error;
pub use registry::{Registry, RegistryStats};

// Re-export specific items to avoid ambiguous glob re-exports
pub use models::{
    Agent, AgentCategory, AgentDraft, AgentMetadata, AgentPage, AgentPatch, AgentQuery,
    Deployment, DeploymentConfig, DeploymentLog, DeploymentResult, DeploymentStatus, Environment,
    LogLevel, Performance, Pricing, PricingModel, ResourceSpec, SortBy, SortOrder,
};

pub use services::{
    search_agents, AgentStore, DeploymentEngine, DeploymentError, RateLimitDecision,
    RateLimiterService, StoreError,
};
