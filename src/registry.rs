//! Registry facade
//!
//! Single entry point tying the agent store, deployment engine, and rate
//! limiter together. Construction wires the services; `shutdown` aborts any
//! in-flight completion timers. Deployment operations fold engine errors
//! into in-band `DeploymentResult` failures so callers always get the same
//! result shape; CRUD operations surface errors through [`Error`].

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::config::RegistryConfig;
use crate::error::Error;
use crate::models::{
    Agent, AgentCategory, AgentDraft, AgentPage, AgentPatch, AgentQuery, Deployment,
    DeploymentConfig, DeploymentResult,
};
use crate::seed;
use crate::services::{
    search_agents, AgentStore, DeploymentEngine, DeploymentError, RateLimiterService,
};

/// Aggregate counters across the whole registry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_agents: usize,
    pub active_deployments: usize,
    pub category_counts: HashMap<AgentCategory, usize>,
    pub average_rating: f64,
}

/// Facade over the registry services
///
/// Cheap to clone; clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    store: AgentStore,
    deployments: DeploymentEngine,
    rate_limiter: RateLimiterService,
}

impl Registry {
    /// Build an empty registry from configuration
    pub fn new(config: RegistryConfig) -> Self {
        let store = AgentStore::new();
        let deployments = DeploymentEngine::new(store.clone(), config.completion_delay);
        let rate_limiter =
            RateLimiterService::new(config.rate_limit_points, config.rate_limit_window);

        info!(
            completion_delay_ms = config.completion_delay.as_millis() as u64,
            rate_limit_points = config.rate_limit_points,
            "agent registry initialized"
        );

        Self {
            config,
            store,
            deployments,
            rate_limiter,
        }
    }

    /// Build a registry pre-populated with the sample catalog
    pub async fn with_sample_agents(config: RegistryConfig) -> Self {
        let registry = Self::new(config);
        for agent in seed::sample_agents() {
            registry.store.insert_seed(agent).await;
        }
        registry
    }

    /// Abort outstanding completion timers
    ///
    /// Safe to call more than once; deployments stuck in `deploying` stay
    /// there, which is the honest state for work that never finished.
    pub async fn shutdown(&self) {
        self.deployments.shutdown().await;
        info!("agent registry shut down");
    }

    pub async fn create_agent(&self, draft: AgentDraft) -> Result<Agent, Error> {
        Ok(self.store.create(draft).await?)
    }

    pub async fn get_agent(&self, id: &str) -> Option<Agent> {
        self.store.get(id).await
    }

    /// Filter, sort, and paginate the catalog
    pub async fn list_agents(&self, query: &AgentQuery) -> AgentPage {
        search_agents(
            self.store.list().await,
            query,
            self.config.default_page_size,
        )
    }

    /// Apply a partial update; `Ok(None)` when the agent does not exist
    pub async fn update_agent(&self, id: &str, patch: AgentPatch) -> Result<Option<Agent>, Error> {
        Ok(self.store.update(id, patch).await?)
    }

    /// Delete an agent along with its deployment history
    ///
    /// A single atomic cascade: records, timers, and the agent row all go
    /// under one hold of the engine lock, so neither a completion firing
    /// mid-delete nor a racing deploy can leave anything behind.
    pub async fn delete_agent(&self, agent_id: &str) -> bool {
        let (removed, deleted) = self.deployments.remove_agent(agent_id).await;
        if removed > 0 {
            info!(agent_id = %agent_id, removed = removed, "deployment records purged");
        }
        deleted
    }

    pub async fn deploy_agent(&self, agent_id: &str, config: DeploymentConfig) -> DeploymentResult {
        match self.deployments.deploy(agent_id, config).await {
            Ok(result) => result,
            Err(err) => fold_deployment_error(err),
        }
    }

    pub async fn stop_agent(&self, agent_id: &str) -> DeploymentResult {
        match self.deployments.stop(agent_id).await {
            Ok(result) => result,
            Err(err) => fold_deployment_error(err),
        }
    }

    pub async fn restart_agent(
        &self,
        agent_id: &str,
        config: DeploymentConfig,
    ) -> DeploymentResult {
        match self.deployments.restart(agent_id, config).await {
            Ok(result) => result,
            Err(err) => fold_deployment_error(err),
        }
    }

    pub async fn get_deployment(&self, deployment_id: &str) -> Option<Deployment> {
        self.deployments.deployment(deployment_id).await
    }

    /// Deployment history for one agent, oldest first
    pub async fn agent_deployments(&self, agent_id: &str) -> Vec<Deployment> {
        self.deployments.deployments_for(agent_id).await
    }

    /// Admission control for callers fronting the registry
    ///
    /// The registry itself never gates its own operations; embedders decide
    /// which calls to meter.
    pub fn rate_limiter(&self) -> &RateLimiterService {
        &self.rate_limiter
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Catalog-wide statistics
    pub async fn stats(&self) -> RegistryStats {
        let agents = self.store.list().await;
        let active_deployments = self.deployments.active_count().await;

        let mut category_counts: HashMap<AgentCategory, usize> = HashMap::new();
        for agent in &agents {
            *category_counts.entry(agent.category).or_insert(0) += 1;
        }

        let average_rating = if agents.is_empty() {
            0.0
        } else {
            agents.iter().map(|a| a.metadata.rating).sum::<f64>() / agents.len() as f64
        };

        RegistryStats {
            total_agents: agents.len(),
            active_deployments,
            category_counts,
            average_rating,
        }
    }
}

/// Deployment operations report failure in-band rather than erroring, so
/// JSON consumers see one result shape either way
fn fold_deployment_error(err: DeploymentError) -> DeploymentResult {
    let error = match &err {
        DeploymentError::AgentNotFound(_) => "Agent not found",
        DeploymentError::AlreadyActive { .. } => "Deployment already active",
    };
    DeploymentResult::failure(error, err.to_string())
}
