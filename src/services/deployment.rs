//! Deployment engine
//!
//! Owns deployment records and the lifecycle state machine:
//! pending -> deploying -> running -> stopped or failed. Completion is
//! simulated: a spawned timer promotes a deploying record to running after a
//! configured delay unless the deployment was stopped first. Timers are
//! retained so stop, cascade delete, and shutdown can abort them; a timer
//! that fires anyway finds the record no longer in `deploying` and leaves it
//! alone.
//!
//! The engine lock is the serialization point for every operation that
//! touches both the deployment map and the agent table: existence checks,
//! status-cache writes, and the delete cascade all run while it is held.
//! Lock order is engine state before the agent table, never the reverse.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    Deployment, DeploymentConfig, DeploymentLog, DeploymentResult, DeploymentStatus, LogLevel,
};
use crate::services::store::AgentStore;

/// Errors that can occur while driving the deployment lifecycle
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("Agent with ID '{0}' does not exist")]
    AgentNotFound(String),
    #[error("Agent '{agent_id}' already has an active deployment: {deployment_id}")]
    AlreadyActive {
        agent_id: String,
        deployment_id: String,
    },
}

#[derive(Debug, Default)]
struct EngineState {
    deployments: HashMap<String, Deployment>,
    /// Completion timers for deployments still on their way to `running`
    timers: HashMap<String, JoinHandle<()>>,
}

/// Deployment engine shared across the registry
#[derive(Debug, Clone)]
pub struct DeploymentEngine {
    store: AgentStore,
    state: Arc<RwLock<EngineState>>,
    completion_delay: Duration,
}

impl DeploymentEngine {
    pub fn new(store: AgentStore, completion_delay: Duration) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(EngineState::default())),
            completion_delay,
        }
    }

    /// Start a deployment for an agent
    ///
    /// The record is created in `pending` and moved to `deploying` before it
    /// becomes visible; the transition to `running` happens later on a timer
    /// task. The call itself never waits for the simulated delay. An agent
    /// may have at most one non-terminal deployment at a time.
    pub async fn deploy(
        &self,
        agent_id: &str,
        config: DeploymentConfig,
    ) -> Result<DeploymentResult, DeploymentError> {
        let DeploymentConfig {
            environment,
            config,
            resources,
        } = config;

        let mut state = self.state.write().await;

        // Existence is checked under the same lock hold that inserts the
        // record, so a concurrent cascade delete cannot land in between
        let agent = self
            .store
            .get(agent_id)
            .await
            .ok_or_else(|| DeploymentError::AgentNotFound(agent_id.to_string()))?;

        if let Some(active) = state
            .deployments
            .values()
            .find(|d| d.agent_id == agent_id && !d.status.is_terminal())
        {
            return Err(DeploymentError::AlreadyActive {
                agent_id: agent_id.to_string(),
                deployment_id: active.id.clone(),
            });
        }

        let now = Utc::now();
        let mut deployment = Deployment {
            id: Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            environment,
            status: DeploymentStatus::Pending,
            config,
            resources,
            logs: vec![DeploymentLog {
                timestamp: now,
                level: LogLevel::Info,
                message: format!("Starting deployment of {} to {}", agent.name, environment),
            }],
            start_time: now,
            completed_at: None,
        };

        // Provisioning begins at once; the record leaves `pending` before
        // any reader can observe it
        deployment.status = DeploymentStatus::Deploying;

        let deployment_id = deployment.id.clone();
        state.deployments.insert(deployment_id.clone(), deployment);

        let timer = tokio::spawn({
            let engine = self.clone();
            let deployment_id = deployment_id.clone();
            let delay = self.completion_delay;
            async move {
                tokio::time::sleep(delay).await;
                engine.complete(&deployment_id).await;
            }
        });
        state.timers.insert(deployment_id.clone(), timer);

        info!(
            agent_id = %agent_id,
            deployment_id = %deployment_id,
            environment = %environment,
            "deployment started"
        );

        Ok(DeploymentResult {
            success: true,
            deployment_id: Some(deployment_id),
            status: Some(DeploymentStatus::Deploying),
            message: Some(format!("Deployment of {} started successfully", agent.name)),
            error: None,
        })
    }

    /// Promote a deployment to `running` after the simulated delay
    ///
    /// No-op unless the record is still `deploying`: a stop that won the
    /// race leaves a terminal status behind, and that status stays.
    async fn complete(&self, deployment_id: &str) {
        let mut state = self.state.write().await;
        state.timers.remove(deployment_id);

        let deployment = match state.deployments.get_mut(deployment_id) {
            Some(deployment) if deployment.status == DeploymentStatus::Deploying => deployment,
            _ => return,
        };

        let now = Utc::now();
        deployment.status = DeploymentStatus::Running;
        deployment.completed_at = Some(now);
        deployment.logs.push(DeploymentLog {
            timestamp: now,
            level: LogLevel::Info,
            message: "Deployment completed successfully".to_string(),
        });
        let agent_id = deployment.agent_id.clone();

        // The record transition and the agent's status cache commit under
        // one lock hold; a racing stop observes both or neither
        self.store.mark_deployed(&agent_id).await;

        info!(deployment_id = %deployment_id, agent_id = %agent_id, "deployment running");
    }

    /// Stop an agent's active deployments
    ///
    /// "Nothing to stop" is an unsuccessful result rather than an error;
    /// callers treat it as a normal outcome. Stopping aborts any pending
    /// completion timer and clears the agent's cached deployment status.
    pub async fn stop(&self, agent_id: &str) -> Result<DeploymentResult, DeploymentError> {
        let mut state = self.state.write().await;

        let agent = self
            .store
            .get(agent_id)
            .await
            .ok_or_else(|| DeploymentError::AgentNotFound(agent_id.to_string()))?;

        let active_ids: Vec<String> = state
            .deployments
            .values()
            .filter(|d| d.agent_id == agent_id && !d.status.is_terminal())
            .map(|d| d.id.clone())
            .collect();

        if active_ids.is_empty() {
            return Ok(DeploymentResult::failure(
                "No active deployments",
                format!("No active deployments found for {}", agent.name),
            ));
        }

        let now = Utc::now();
        for id in &active_ids {
            if let Some(timer) = state.timers.remove(id) {
                timer.abort();
            }
            if let Some(deployment) = state.deployments.get_mut(id) {
                deployment.status = DeploymentStatus::Stopped;
                deployment.completed_at = Some(now);
                deployment.logs.push(DeploymentLog {
                    timestamp: now,
                    level: LogLevel::Info,
                    message: "Agent stopped by user request".to_string(),
                });
            }
        }

        // Cleared under the same lock hold that stopped the records, so a
        // completion serialized behind this call cannot leave the cache stale
        self.store.set_deployment_status(agent_id, None).await;
        drop(state);

        info!(agent_id = %agent_id, stopped = active_ids.len(), "agent stopped");

        Ok(DeploymentResult {
            success: true,
            deployment_id: None,
            status: Some(DeploymentStatus::Stopped),
            message: Some(format!("{} stopped successfully", agent.name)),
            error: None,
        })
    }

    /// Stop whatever is active, then start a fresh deployment
    ///
    /// The stop half is best-effort: an agent with nothing running restarts
    /// into a plain deploy. A fresh record and id are always created;
    /// restart is not a transition on the old deployment.
    pub async fn restart(
        &self,
        agent_id: &str,
        config: DeploymentConfig,
    ) -> Result<DeploymentResult, DeploymentError> {
        self.stop(agent_id).await?;
        self.deploy(agent_id, config).await
    }

    /// Fetch a deployment by id
    pub async fn deployment(&self, deployment_id: &str) -> Option<Deployment> {
        self.state
            .read()
            .await
            .deployments
            .get(deployment_id)
            .cloned()
    }

    /// All deployments for one agent, oldest first
    pub async fn deployments_for(&self, agent_id: &str) -> Vec<Deployment> {
        let state = self.state.read().await;
        let mut deployments: Vec<Deployment> = state
            .deployments
            .values()
            .filter(|d| d.agent_id == agent_id)
            .cloned()
            .collect();
        deployments.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        deployments
    }

    /// Snapshot of every deployment record
    pub async fn deployments(&self) -> Vec<Deployment> {
        self.state
            .read()
            .await
            .deployments
            .values()
            .cloned()
            .collect()
    }

    /// Deployments currently in `running`
    pub async fn active_count(&self) -> usize {
        self.state
            .read()
            .await
            .deployments
            .values()
            .filter(|d| d.status == DeploymentStatus::Running)
            .count()
    }

    /// Delete an agent together with its deployment records and timers
    ///
    /// The whole cascade commits under one hold of the engine lock, agent
    /// row included: a deploy racing this call either finishes first and has
    /// its record purged here, or serializes behind it and fails its
    /// existence check. Returns the purge count and whether the agent
    /// existed.
    pub(crate) async fn remove_agent(&self, agent_id: &str) -> (usize, bool) {
        let mut state = self.state.write().await;

        let ids: Vec<String> = state
            .deployments
            .values()
            .filter(|d| d.agent_id == agent_id)
            .map(|d| d.id.clone())
            .collect();

        for id in &ids {
            if let Some(timer) = state.timers.remove(id) {
                timer.abort();
            }
            state.deployments.remove(id);
        }

        let deleted = self.store.delete(agent_id).await;

        (ids.len(), deleted)
    }

    /// Abort all pending completion timers so none outlives the registry
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
    }
}
