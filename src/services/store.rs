//! Agent store
//!
//! Sole owner of the agent table. Enforces id identity and case-insensitive
//! name uniqueness; every other component works on snapshots or goes through
//! the engine-only callbacks at the bottom of this file.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{Agent, AgentDraft, AgentMetadata, AgentPatch, DeploymentStatus};

/// Errors that can occur while mutating the agent table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Agent name already exists: {0}")]
    NameExists(String),
    #[error("{0}")]
    Validation(String),
}

/// In-memory agent table shared across services
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    agents: Arc<RwLock<HashMap<String, Agent>>>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self {
            agents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new agent
    ///
    /// The draft is validated before anything is written, so a rejected
    /// create never leaves a partial record behind. Names collide
    /// case-insensitively.
    pub async fn create(&self, draft: AgentDraft) -> Result<Agent, StoreError> {
        Self::validate_draft(&draft)?;

        let mut agents = self.agents.write().await;

        let lowered = draft.name.to_lowercase();
        if agents.values().any(|a| a.name.to_lowercase() == lowered) {
            return Err(StoreError::NameExists(draft.name));
        }

        let now = Utc::now();
        let agent = Agent {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            category: draft.category,
            description: draft.description,
            features: draft.features,
            capabilities: draft.capabilities,
            use_cases: draft.use_cases,
            version: draft.version,
            tech_stack: draft.tech_stack,
            repository_url: draft.repository_url,
            documentation_url: draft.documentation_url,
            is_active: draft.is_active,
            is_open_source: draft.is_open_source,
            pricing: draft.pricing,
            performance: draft.performance,
            metadata: AgentMetadata {
                total_deployments: 0,
                rating: 0.0,
                last_updated: now,
                created_at: now,
                updated_at: now,
            },
            deployment_status: None,
            icon: draft.icon,
            thumbnail: draft.thumbnail,
            tags: draft.tags,
        };

        agents.insert(agent.id.clone(), agent.clone());
        info!(agent_id = %agent.id, name = %agent.name, "agent created");

        Ok(agent)
    }

    /// Fetch an agent by id. Absence is a normal result, not an error.
    pub async fn get(&self, id: &str) -> Option<Agent> {
        self.agents.read().await.get(id).cloned()
    }

    /// Apply a partial update
    ///
    /// Returns `Ok(None)` when the agent does not exist; absence is decided
    /// before any other outcome of the patch. The id never changes,
    /// `updated_at` is refreshed on every successful call, and a rename is
    /// held to the same case-insensitive uniqueness rule as create (the
    /// agent's own name excluded).
    pub async fn update(&self, id: &str, patch: AgentPatch) -> Result<Option<Agent>, StoreError> {
        Self::validate_patch(&patch)?;

        let mut agents = self.agents.write().await;

        if !agents.contains_key(id) {
            return Ok(None);
        }

        if let Some(new_name) = &patch.name {
            let lowered = new_name.to_lowercase();
            if agents
                .values()
                .any(|a| a.id != id && a.name.to_lowercase() == lowered)
            {
                return Err(StoreError::NameExists(new_name.clone()));
            }
        }

        let agent = match agents.get_mut(id) {
            Some(agent) => agent,
            None => return Ok(None),
        };

        let updated_fields = patch.changed_fields();

        if let Some(name) = patch.name {
            agent.name = name;
        }
        if let Some(description) = patch.description {
            agent.description = description;
        }
        if let Some(features) = patch.features {
            agent.features = features;
        }
        if let Some(capabilities) = patch.capabilities {
            agent.capabilities = capabilities;
        }
        if let Some(use_cases) = patch.use_cases {
            agent.use_cases = use_cases;
        }
        if let Some(tags) = patch.tags {
            agent.tags = tags;
        }
        if let Some(version) = patch.version {
            agent.version = version;
        }
        if let Some(tech_stack) = patch.tech_stack {
            agent.tech_stack = tech_stack;
        }
        if let Some(repository_url) = patch.repository_url {
            agent.repository_url = Some(repository_url);
        }
        if let Some(documentation_url) = patch.documentation_url {
            agent.documentation_url = Some(documentation_url);
        }
        if let Some(pricing) = patch.pricing {
            agent.pricing = pricing;
        }
        if let Some(performance) = patch.performance {
            agent.performance = performance;
        }
        if let Some(is_active) = patch.is_active {
            agent.is_active = is_active;
        }
        if let Some(is_open_source) = patch.is_open_source {
            agent.is_open_source = is_open_source;
        }
        if let Some(icon) = patch.icon {
            agent.icon = Some(icon);
        }
        if let Some(thumbnail) = patch.thumbnail {
            agent.thumbnail = Some(thumbnail);
        }

        agent.metadata.updated_at = Utc::now();

        info!(agent_id = %id, updated_fields = ?updated_fields, "agent updated");
        Ok(Some(agent.clone()))
    }

    /// Remove an agent, returning whether anything was removed. Deployment
    /// cleanup belongs to the cascade in `Registry::delete_agent`.
    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.agents.write().await.remove(id).is_some();
        if removed {
            info!(agent_id = %id, "agent deleted");
        }
        removed
    }

    /// Snapshot of all agents, in no particular order
    pub async fn list(&self) -> Vec<Agent> {
        self.agents.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }

    /// Insert a fully formed record, replacing any record with the same id.
    /// Used to pre-seed fixture data at startup.
    pub async fn insert_seed(&self, agent: Agent) {
        self.agents.write().await.insert(agent.id.clone(), agent);
    }

    /// Record a completed deployment: bump the lifetime counter and cache
    /// the running status on the agent. Deployment-engine callback.
    pub(crate) async fn mark_deployed(&self, id: &str) {
        let mut agents = self.agents.write().await;
        if let Some(agent) = agents.get_mut(id) {
            let now = Utc::now();
            agent.metadata.total_deployments += 1;
            agent.metadata.updated_at = now;
            agent.metadata.last_updated = now;
            agent.deployment_status = Some(DeploymentStatus::Running);
        }
    }

    /// Overwrite the denormalized deployment status cache; `None` clears
    /// it. Deployment-engine callback.
    pub(crate) async fn set_deployment_status(&self, id: &str, status: Option<DeploymentStatus>) {
        let mut agents = self.agents.write().await;
        if let Some(agent) = agents.get_mut(id) {
            agent.deployment_status = status;
            agent.metadata.updated_at = Utc::now();
        }
    }

    fn validate_draft(draft: &AgentDraft) -> Result<(), StoreError> {
        Self::validate_name(&draft.name)?;
        Self::validate_description(&draft.description)?;
        Self::validate_version(&draft.version)?;
        if draft.features.is_empty() {
            return Err(StoreError::Validation(
                "At least one feature is required".to_string(),
            ));
        }
        if draft.tech_stack.is_empty() {
            return Err(StoreError::Validation(
                "At least one tech stack entry is required".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_patch(patch: &AgentPatch) -> Result<(), StoreError> {
        if let Some(name) = &patch.name {
            Self::validate_name(name)?;
        }
        if let Some(description) = &patch.description {
            Self::validate_description(description)?;
        }
        if let Some(version) = &patch.version {
            Self::validate_version(version)?;
        }
        if matches!(&patch.features, Some(features) if features.is_empty()) {
            return Err(StoreError::Validation(
                "At least one feature is required".to_string(),
            ));
        }
        if matches!(&patch.tech_stack, Some(stack) if stack.is_empty()) {
            return Err(StoreError::Validation(
                "At least one tech stack entry is required".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), StoreError> {
        let length = name.chars().count();
        if length == 0 || length > 100 {
            return Err(StoreError::Validation(
                "Agent name must be 1-100 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), StoreError> {
        let length = description.chars().count();
        if !(10..=500).contains(&length) {
            return Err(StoreError::Validation(
                "Description must be 10-500 characters".to_string(),
            ));
        }
        Ok(())
    }

    // MAJOR.MINOR.PATCH, digits only
    fn validate_version(version: &str) -> Result<(), StoreError> {
        let parts: Vec<&str> = version.split('.').collect();
        let valid = parts.len() == 3
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !valid {
            return Err(StoreError::Validation(
                "Version must follow MAJOR.MINOR.PATCH".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentCategory;
    use proptest::prelude::*;

    fn draft(name: &str) -> AgentDraft {
        AgentDraft {
            name: name.to_string(),
            category: AgentCategory::Research,
            description: "Autonomous literature survey agent".to_string(),
            features: vec!["Paper Search".to_string()],
            version: "1.0.0".to_string(),
            tech_stack: vec!["GPT-4".to_string()],
            capabilities: String::new(),
            use_cases: Vec::new(),
            tags: Vec::new(),
            repository_url: None,
            documentation_url: None,
            pricing: Default::default(),
            performance: Default::default(),
            is_active: true,
            is_open_source: true,
            icon: None,
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_roundtrips() {
        let store = AgentStore::new();

        let created = store.create(draft("Scout")).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.metadata.total_deployments, 0);
        assert_eq!(created.metadata.created_at, created.metadata.updated_at);
        assert!(created.deployment_status.is_none());

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_case_insensitively() {
        let store = AgentStore::new();
        store.create(draft("Scout")).await.unwrap();

        let result = store.create(draft("sCOUT")).await;
        assert!(matches!(result, Err(StoreError::NameExists(_))));

        // The failed create must not have written anything
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_none() {
        let store = AgentStore::new();
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn update_merges_and_advances_updated_at() {
        let store = AgentStore::new();
        let created = store.create(draft("Scout")).await.unwrap();

        let patch = AgentPatch {
            description: Some("Scans arxiv and summarizes new papers".to_string()),
            tags: Some(vec!["research".to_string()]),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Scout");
        assert_eq!(updated.description, "Scans arxiv and summarizes new papers");
        assert_eq!(updated.tags, vec!["research".to_string()]);
        assert!(updated.metadata.updated_at >= created.metadata.updated_at);
        assert_eq!(updated.metadata.created_at, created.metadata.created_at);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let store = AgentStore::new();
        let result = store.update("missing", AgentPatch::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none_even_when_the_name_is_taken() {
        let store = AgentStore::new();
        store.create(draft("Scout")).await.unwrap();

        let patch = AgentPatch {
            name: Some("Scout".to_string()),
            ..Default::default()
        };
        let result = store.update("missing", patch).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn rename_collision_is_rejected_but_self_rename_allowed() {
        let store = AgentStore::new();
        let scout = store.create(draft("Scout")).await.unwrap();
        store.create(draft("Ranger")).await.unwrap();

        let patch = AgentPatch {
            name: Some("RANGER".to_string()),
            ..Default::default()
        };
        let result = store.update(&scout.id, patch).await;
        assert!(matches!(result, Err(StoreError::NameExists(_))));

        // Re-casing the agent's own name is not a collision
        let patch = AgentPatch {
            name: Some("SCOUT".to_string()),
            ..Default::default()
        };
        let updated = store.update(&scout.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "SCOUT");
    }

    #[tokio::test]
    async fn delete_removes_and_reports() {
        let store = AgentStore::new();
        let created = store.create(draft("Scout")).await.unwrap();

        assert!(store.delete(&created.id).await);
        assert!(store.get(&created.id).await.is_none());
        assert!(!store.delete(&created.id).await);
    }

    #[tokio::test]
    async fn validation_rejects_before_mutation() {
        let store = AgentStore::new();

        let mut bad = draft("");
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        bad = draft("Scout");
        bad.description = "too short".to_string();
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        bad = draft("Scout");
        bad.version = "1.0".to_string();
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        bad = draft("Scout");
        bad.version = "1.0.x".to_string();
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        bad = draft("Scout");
        bad.features = Vec::new();
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        bad = draft(&"x".repeat(101));
        assert!(matches!(
            store.create(bad).await,
            Err(StoreError::Validation(_))
        ));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn patch_validation_applies_to_present_fields_only() {
        let store = AgentStore::new();
        let created = store.create(draft("Scout")).await.unwrap();

        let patch = AgentPatch {
            version: Some("2".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&created.id, patch).await,
            Err(StoreError::Validation(_))
        ));

        let patch = AgentPatch {
            features: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&created.id, patch).await,
            Err(StoreError::Validation(_))
        ));

        // A failed patch leaves the record untouched
        let unchanged = store.get(&created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn mark_deployed_bumps_counter_and_caches_status() {
        let store = AgentStore::new();
        let created = store.create(draft("Scout")).await.unwrap();

        store.mark_deployed(&created.id).await;
        store.mark_deployed(&created.id).await;

        let agent = store.get(&created.id).await.unwrap();
        assert_eq!(agent.metadata.total_deployments, 2);
        assert_eq!(agent.deployment_status, Some(DeploymentStatus::Running));

        store.set_deployment_status(&created.id, None).await;
        let agent = store.get(&created.id).await.unwrap();
        assert!(agent.deployment_status.is_none());
        assert_eq!(agent.metadata.total_deployments, 2);
    }

    fn flip_case(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_lowercase() {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Any two drafts whose names differ only by case conflict.
        #[test]
        fn case_variants_always_conflict(name in "[a-zA-Z][a-zA-Z0-9 ]{0,40}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let store = AgentStore::new();
                store.create(draft(&name)).await.unwrap();

                let second = store.create(draft(&flip_case(&name))).await;
                assert!(matches!(second, Err(StoreError::NameExists(_))));
                assert_eq!(store.len().await, 1);
            });
        }
    }
}
