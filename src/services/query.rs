//! Agent listing queries
//!
//! Stateless filter / sort / paginate pipeline over a store snapshot. The
//! store owns the data; this module owns the ordering semantics.

use std::cmp::Ordering;

use crate::models::{Agent, AgentPage, AgentQuery, SortBy, SortOrder};

/// Apply a query to a snapshot of agents
///
/// Filtering happens before sorting, sorting before pagination. Equal sort
/// keys are ordered by id ascending so repeated queries paginate over a
/// stable sequence.
pub fn search_agents(snapshot: Vec<Agent>, query: &AgentQuery, default_limit: usize) -> AgentPage {
    let mut agents: Vec<Agent> = snapshot
        .into_iter()
        .filter(|agent| matches_category(agent, query) && matches_search(agent, query))
        .collect();

    agents.sort_by(|a, b| compare(a, b, query.sort_by, query.sort_order));

    let total = agents.len();
    let offset = query.effective_offset();
    let limit = query.effective_limit(default_limit);

    let items: Vec<Agent> = agents.into_iter().skip(offset).take(limit).collect();

    AgentPage {
        items,
        total,
        has_next: offset.saturating_add(limit) < total,
        has_previous: offset > 0,
    }
}

fn matches_category(agent: &Agent, query: &AgentQuery) -> bool {
    match query.category {
        Some(category) => agent.category == category,
        None => true,
    }
}

fn matches_search(agent: &Agent, query: &AgentQuery) -> bool {
    let term = match &query.search {
        Some(term) => term.to_lowercase(),
        None => return true,
    };

    agent.name.to_lowercase().contains(&term)
        || agent.description.to_lowercase().contains(&term)
        || agent.category.as_str().contains(&term)
        || agent
            .features
            .iter()
            .any(|feature| feature.to_lowercase().contains(&term))
        || agent.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

/// Primary comparator with the direction applied, then the id tie-break.
/// Descending reverses only the primary key, so equal-key runs keep the
/// same id order in both directions.
fn compare(a: &Agent, b: &Agent, sort_by: SortBy, order: SortOrder) -> Ordering {
    let primary = match sort_by {
        SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortBy::Category => a.category.as_str().cmp(b.category.as_str()),
        SortBy::CreatedAt => a.metadata.created_at.cmp(&b.metadata.created_at),
        SortBy::Popularity => a
            .metadata
            .total_deployments
            .cmp(&b.metadata.total_deployments),
        SortBy::Rating => a.metadata.rating.total_cmp(&b.metadata.rating),
    };

    let directed = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };

    directed.then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgentCategory, AgentMetadata, Performance, Pricing};
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    use crate::models::DEFAULT_PAGE_SIZE;

    fn agent(
        id: &str,
        name: &str,
        category: AgentCategory,
        deployments: u64,
        rating: f64,
        created_days_ago: i64,
    ) -> Agent {
        let created = Utc::now() - Duration::days(created_days_ago);
        Agent {
            id: id.to_string(),
            name: name.to_string(),
            category,
            description: format!("{name} does agent things"),
            features: vec!["Automation".to_string()],
            capabilities: String::new(),
            use_cases: Vec::new(),
            version: "1.0.0".to_string(),
            tech_stack: vec!["GPT-4".to_string()],
            repository_url: None,
            documentation_url: None,
            is_active: true,
            is_open_source: true,
            pricing: Pricing::default(),
            performance: Performance::default(),
            metadata: AgentMetadata {
                total_deployments: deployments,
                rating,
                last_updated: created,
                created_at: created,
                updated_at: created,
            },
            deployment_status: None,
            icon: None,
            thumbnail: None,
            tags: vec!["fixture".to_string()],
        }
    }

    fn catalog() -> Vec<Agent> {
        vec![
            agent("a1", "Aider", AgentCategory::Coding, 4_123, 4.5, 400),
            agent("a2", "ChatDev", AgentCategory::Enterprise, 1_234, 4.8, 300),
            agent("a3", "ChemCrow", AgentCategory::Research, 892, 4.7, 200),
            agent("a4", "SWE-Agent", AgentCategory::Coding, 5_678, 4.6, 100),
        ]
    }

    fn query() -> AgentQuery {
        AgentQuery::default()
    }

    fn ids(page: &AgentPage) -> Vec<&str> {
        page.items.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn category_filter_is_exact() {
        let page = search_agents(
            catalog(),
            &AgentQuery {
                category: Some(AgentCategory::Coding),
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );

        assert_eq!(page.total, 2);
        assert_eq!(ids(&page), vec!["a1", "a4"]);
    }

    #[test]
    fn search_matches_any_text_field() {
        // Name match, case-insensitive
        let page = search_agents(
            catalog(),
            &AgentQuery {
                search: Some("chem".to_string()),
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&page), vec!["a3"]);

        // Tag match
        let page = search_agents(
            catalog(),
            &AgentQuery {
                search: Some("FIXTURE".to_string()),
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(page.total, 4);

        // Category wire-name match
        let page = search_agents(
            catalog(),
            &AgentQuery {
                search: Some("enterprise".to_string()),
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&page), vec!["a2"]);

        // No match
        let page = search_agents(
            catalog(),
            &AgentQuery {
                search: Some("quantum".to_string()),
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn name_sort_ignores_case_and_reverses_cleanly() {
        let page = search_agents(catalog(), &query(), DEFAULT_PAGE_SIZE);
        assert_eq!(ids(&page), vec!["a1", "a2", "a3", "a4"]);

        let page = search_agents(
            catalog(),
            &AgentQuery {
                sort_order: SortOrder::Desc,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&page), vec!["a4", "a3", "a2", "a1"]);
    }

    #[test]
    fn popularity_sorts_numerically_not_lexicographically() {
        // 892 must sort below 1,234 and 5,678 despite "892" > "1,234" as text
        let page = search_agents(
            catalog(),
            &AgentQuery {
                sort_by: SortBy::Popularity,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&page), vec!["a3", "a2", "a1", "a4"]);
    }

    #[test]
    fn created_at_sorts_by_timestamp() {
        let page = search_agents(
            catalog(),
            &AgentQuery {
                sort_by: SortBy::CreatedAt,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        // Oldest (400 days ago) first
        assert_eq!(ids(&page), vec!["a1", "a2", "a3", "a4"]);

        let page = search_agents(
            catalog(),
            &AgentQuery {
                sort_by: SortBy::CreatedAt,
                sort_order: SortOrder::Desc,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&page), vec!["a4", "a3", "a2", "a1"]);
    }

    #[test]
    fn ties_break_by_id_in_both_directions() {
        let snapshot = vec![
            agent("b2", "Beta", AgentCategory::Coding, 100, 4.0, 10),
            agent("b1", "Alpha", AgentCategory::Coding, 100, 4.0, 10),
            agent("b3", "Gamma", AgentCategory::Coding, 100, 4.0, 10),
        ];

        let asc = search_agents(
            snapshot.clone(),
            &AgentQuery {
                sort_by: SortBy::Rating,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&asc), vec!["b1", "b2", "b3"]);

        // All ratings equal: descending must not flip the tie-break order
        let desc = search_agents(
            snapshot,
            &AgentQuery {
                sort_by: SortBy::Rating,
                sort_order: SortOrder::Desc,
                ..query()
            },
            DEFAULT_PAGE_SIZE,
        );
        assert_eq!(ids(&desc), vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn pagination_window_and_flags() {
        let q = AgentQuery {
            limit: Some(2),
            offset: Some(0),
            ..query()
        };
        let page = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        assert_eq!(ids(&page), vec!["a1", "a2"]);
        assert_eq!(page.total, 4);
        assert!(page.has_next);
        assert!(!page.has_previous);

        let q = AgentQuery {
            limit: Some(2),
            offset: Some(2),
            ..query()
        };
        let page = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        assert_eq!(ids(&page), vec!["a3", "a4"]);
        assert!(!page.has_next);
        assert!(page.has_previous);

        // Offset past the end yields an empty window, not an error
        let q = AgentQuery {
            limit: Some(2),
            offset: Some(10),
            ..query()
        };
        let page = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 4);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn huge_offset_is_an_empty_page_not_an_overflow() {
        let q = AgentQuery {
            limit: Some(2),
            offset: Some(usize::MAX),
            ..query()
        };
        let page = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 4);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn sorting_is_deterministic_across_runs() {
        let q = AgentQuery {
            sort_by: SortBy::Rating,
            sort_order: SortOrder::Desc,
            ..query()
        };
        let first = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        let second = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);
        assert_eq!(ids(&first), ids(&second));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Window length always equals min(limit, max(0, total - offset)).
        #[test]
        fn window_arithmetic_holds(offset in 0usize..12, limit in 0usize..12) {
            let q = AgentQuery {
                limit: Some(limit),
                offset: Some(offset),
                ..AgentQuery::default()
            };
            let page = search_agents(catalog(), &q, DEFAULT_PAGE_SIZE);

            let total = 4usize;
            let expected_len = limit.min(total.saturating_sub(offset));
            prop_assert_eq!(page.items.len(), expected_len);
            prop_assert_eq!(page.total, total);
            prop_assert_eq!(page.has_next, offset + limit < total);
            prop_assert_eq!(page.has_previous, offset > 0);
        }
    }
}
