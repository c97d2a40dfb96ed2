use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentCategory};

/// Page size applied when a query does not specify a limit
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Hard cap on page size; larger requested limits are clamped down
pub const MAX_PAGE_SIZE: usize = 100;

/// Sort key for agent listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    Category,
    CreatedAt,
    Popularity,
    Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing parameters: optional filters plus sort and pagination controls
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentQuery {
    /// Exact category match
    #[serde(default)]
    pub category: Option<AgentCategory>,
    /// Case-insensitive substring matched against name, description,
    /// category, tags, and features
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl AgentQuery {
    /// Page size after defaulting and the hard cap
    pub fn effective_limit(&self, default_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit).min(MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// One page of listing results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPage {
    pub items: Vec<Agent>,
    /// Matching agents before the pagination window was applied
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}
