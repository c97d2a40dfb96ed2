use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deployment::DeploymentStatus;

/// Closed set of agent categories. Unknown values are rejected when a
/// payload is deserialized rather than stored as free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentCategory {
    Coding,
    Research,
    Automation,
    Creative,
    Enterprise,
    Productivity,
    CustomerService,
    Sales,
    DataAnalysis,
}

impl AgentCategory {
    /// Wire name of the category ("customer-service", "data-analysis", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Research => "research",
            Self::Automation => "automation",
            Self::Creative => "creative",
            Self::Enterprise => "enterprise",
            Self::Productivity => "productivity",
            Self::CustomerService => "customer-service",
            Self::Sales => "sales",
            Self::DataAnalysis => "data-analysis",
        }
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing tier of an agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingModel {
    #[default]
    Free,
    Freemium,
    Paid,
    Enterprise,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub model: PricingModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

/// Published performance figures. These are display values maintained by the
/// catalog curators ("96%", "25.7s"), not live measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub success_rate: String,
    pub average_speed: String,
    pub uptime: String,
    pub cost_per_task: String,
}

impl Default for Performance {
    fn default() -> Self {
        Self {
            success_rate: "0%".to_string(),
            average_speed: "N/A".to_string(),
            uptime: "100%".to_string(),
            cost_per_task: "$0.00".to_string(),
        }
    }
}

/// Store-owned bookkeeping. Clients never write these fields directly; the
/// store stamps them on create and refreshes them on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    /// Lifetime deployment count. Kept as an integer in memory; the grouped
    /// "1,234" form exists only in serialized output.
    #[serde(with = "grouped_count")]
    pub total_deployments: u64,
    pub rating: f64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A registered, deployable agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub category: AgentCategory,
    pub description: String,
    pub features: Vec<String>,
    pub capabilities: String,
    pub use_cases: Vec<String>,
    pub version: String,
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub is_active: bool,
    pub is_open_source: bool,
    pub pricing: Pricing,
    pub performance: Performance,
    pub metadata: AgentMetadata,
    /// Status of the most recent deployment, cached here by the deployment
    /// engine. Cleared when the agent is stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<DeploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
}

/// Client-supplied fields for registering a new agent. The store assigns the
/// id and metadata; everything optional falls back to catalog defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDraft {
    pub name: String,
    pub category: AgentCategory,
    pub description: String,
    pub features: Vec<String>,
    pub version: String,
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub capabilities: String,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub performance: Performance,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_open_source: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Partial update for an existing agent. Absent fields keep their current
/// values; `id`, `metadata`, and `deploymentStatus` are store-owned and not
/// patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub capabilities: Option<String>,
    pub use_cases: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub version: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub repository_url: Option<String>,
    pub documentation_url: Option<String>,
    pub pricing: Option<Pricing>,
    pub performance: Option<Performance>,
    pub is_active: Option<bool>,
    pub is_open_source: Option<bool>,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
}

impl AgentPatch {
    /// Names of the fields this patch carries, for structured update logs
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.features.is_some() {
            fields.push("features");
        }
        if self.capabilities.is_some() {
            fields.push("capabilities");
        }
        if self.use_cases.is_some() {
            fields.push("useCases");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        if self.version.is_some() {
            fields.push("version");
        }
        if self.tech_stack.is_some() {
            fields.push("techStack");
        }
        if self.repository_url.is_some() {
            fields.push("repositoryUrl");
        }
        if self.documentation_url.is_some() {
            fields.push("documentationUrl");
        }
        if self.pricing.is_some() {
            fields.push("pricing");
        }
        if self.performance.is_some() {
            fields.push("performance");
        }
        if self.is_active.is_some() {
            fields.push("isActive");
        }
        if self.is_open_source.is_some() {
            fields.push("isOpenSource");
        }
        if self.icon.is_some() {
            fields.push("icon");
        }
        if self.thumbnail.is_some() {
            fields.push("thumbnail");
        }
        fields
    }
}

/// Comma-grouped serialization for the deployment counter. Clients render
/// the string verbatim ("12,345"); the registry only ever works with the
/// integer.
pub mod grouped_count {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(count: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&group_thousands(*count))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        digits
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid deployment count: {raw}")))
    }

    /// "1234567" -> "1,234,567"
    pub fn group_thousands(count: u64) -> String {
        let digits = count.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        grouped
    }
}
