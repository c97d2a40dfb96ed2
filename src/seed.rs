//! Sample agent catalog
//!
//! Five well-known agents used to pre-populate a registry for demos and
//! tests. Records are inserted verbatim, counters and ratings included, so
//! listings have realistic data to sort and filter against.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    Agent, AgentCategory, AgentMetadata, Performance, Pricing, PricingModel,
};

fn svec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The built-in sample catalog
pub fn sample_agents() -> Vec<Agent> {
    vec![
        Agent {
            id: "chatdev".to_string(),
            name: "ChatDev".to_string(),
            category: AgentCategory::Enterprise,
            description: "Virtual software company with AI agents in different roles collaborating on software development.".to_string(),
            features: svec(&[
                "Multi-Role Agents",
                "Collaborative Development",
                "QA Testing",
                "Project Management",
                "Code Review",
                "Documentation",
            ]),
            capabilities: "ChatDev simulates an entire software development team with CEO, CTO, programmer, designer, and tester roles. Each agent specializes in their domain for professional-quality output.".to_string(),
            use_cases: svec(&[
                "Enterprise Development",
                "Team Collaboration",
                "Quality Assurance",
                "Large Projects",
                "Professional Software",
                "Corporate Solutions",
            ]),
            version: "1.4.1".to_string(),
            tech_stack: svec(&[
                "GPT-4",
                "Multi-Agent Framework",
                "Git Integration",
                "Docker",
                "Testing Suites",
            ]),
            repository_url: Some("https://github.com/OpenBMB/ChatDev".to_string()),
            documentation_url: Some("https://chatdev.modelbest.cn/".to_string()),
            is_active: true,
            is_open_source: true,
            pricing: Pricing {
                model: PricingModel::Freemium,
                cost: Some("$1.20/project".to_string()),
                features: Vec::new(),
            },
            performance: Performance {
                success_rate: "96%".to_string(),
                average_speed: "25.7s".to_string(),
                uptime: "99.6%".to_string(),
                cost_per_task: "$1.20".to_string(),
            },
            metadata: AgentMetadata {
                total_deployments: 1234,
                rating: 4.8,
                last_updated: date(2024, 1, 12),
                created_at: date(2023, 7, 20),
                updated_at: date(2024, 1, 12),
            },
            deployment_status: None,
            icon: Some("👥".to_string()),
            thumbnail: None,
            tags: svec(&["enterprise", "collaboration", "team", "development"]),
        },
        Agent {
            id: "swe-agent".to_string(),
            name: "SWE-Agent".to_string(),
            category: AgentCategory::Coding,
            description: "Software Engineering Agent that automatically identifies and fixes bugs in codebases.".to_string(),
            features: svec(&[
                "Bug Detection",
                "Automated Fixes",
                "Code Analysis",
                "GitHub Integration",
                "Testing",
                "Quality Assurance",
            ]),
            capabilities: "SWE-Agent analyzes codebases, identifies issues, and implements fixes automatically. Integrates with GitHub for seamless workflow and maintains code quality standards.".to_string(),
            use_cases: svec(&[
                "Bug Fixing",
                "Code Maintenance",
                "Quality Control",
                "GitHub Integration",
                "Automated Testing",
                "Code Review",
            ]),
            version: "0.2.8".to_string(),
            tech_stack: svec(&[
                "GPT-4",
                "GitHub API",
                "Static Analysis",
                "Testing Frameworks",
                "CI/CD",
            ]),
            repository_url: Some("https://github.com/princeton-nlp/SWE-agent".to_string()),
            documentation_url: None,
            is_active: true,
            is_open_source: true,
            pricing: Pricing {
                model: PricingModel::Free,
                cost: Some("$0.25/fix".to_string()),
                features: Vec::new(),
            },
            performance: Performance {
                success_rate: "89%".to_string(),
                average_speed: "8.4s".to_string(),
                uptime: "99.5%".to_string(),
                cost_per_task: "$0.25".to_string(),
            },
            metadata: AgentMetadata {
                total_deployments: 5678,
                rating: 4.6,
                last_updated: date(2024, 1, 14),
                created_at: date(2023, 8, 5),
                updated_at: date(2024, 1, 14),
            },
            deployment_status: None,
            icon: Some("🔧".to_string()),
            thumbnail: None,
            tags: svec(&["coding", "bugs", "automation", "github"]),
        },
        Agent {
            id: "chemcrow".to_string(),
            name: "ChemCrow".to_string(),
            category: AgentCategory::Research,
            description: "Specialized chemistry agent with 13 expert tools for molecular analysis, synthesis planning, and chemical research.".to_string(),
            features: svec(&[
                "Molecular Analysis",
                "Synthesis Planning",
                "Chemical Tools",
                "Expert Knowledge",
                "Research Assistance",
                "Data Analysis",
            ]),
            capabilities: "ChemCrow uses advanced chemistry tools and knowledge bases to assist with molecular analysis, synthesis planning, and chemical research. Outperforms general AI in chemistry-specific tasks.".to_string(),
            use_cases: svec(&[
                "Drug Discovery",
                "Material Science",
                "Chemical Synthesis",
                "Molecular Modeling",
                "Research Analysis",
                "Academic Chemistry",
            ]),
            version: "1.2.0".to_string(),
            tech_stack: svec(&[
                "GPT-4",
                "RDKit",
                "Chemical Databases",
                "Python",
                "Molecular Tools",
            ]),
            repository_url: Some("https://github.com/ur-whitelab/chemcrow-public".to_string()),
            documentation_url: None,
            is_active: true,
            is_open_source: true,
            pricing: Pricing {
                model: PricingModel::Free,
                cost: Some("$0.15/analysis".to_string()),
                features: Vec::new(),
            },
            performance: Performance {
                success_rate: "91%".to_string(),
                average_speed: "12.1s".to_string(),
                uptime: "99.3%".to_string(),
                cost_per_task: "$0.15".to_string(),
            },
            metadata: AgentMetadata {
                total_deployments: 892,
                rating: 4.7,
                last_updated: date(2024, 1, 11),
                created_at: date(2023, 9, 12),
                updated_at: date(2024, 1, 11),
            },
            deployment_status: None,
            icon: Some("🧪".to_string()),
            thumbnail: None,
            tags: svec(&["chemistry", "research", "molecules", "analysis"]),
        },
        Agent {
            id: "aider".to_string(),
            name: "Aider".to_string(),
            category: AgentCategory::Coding,
            description: "AI pair programming tool that edits code in your local git repository. Seamlessly integrates with existing projects.".to_string(),
            features: svec(&[
                "Pair Programming",
                "Git Integration",
                "Local Repository",
                "Code Editing",
                "Context Awareness",
                "Version Control",
            ]),
            capabilities: "Aider works directly with your local git repository, understanding context and making intelligent code changes while maintaining clean git history.".to_string(),
            use_cases: svec(&[
                "Code Enhancement",
                "Bug Fixes",
                "Feature Development",
                "Refactoring",
                "Code Review",
                "Pair Programming",
            ]),
            version: "0.34.0".to_string(),
            tech_stack: svec(&["GPT-4", "Git", "Python", "Tree-sitter", "Language Servers"]),
            repository_url: Some("https://github.com/paul-gauthier/aider".to_string()),
            documentation_url: None,
            is_active: true,
            is_open_source: true,
            pricing: Pricing {
                model: PricingModel::Free,
                cost: Some("$0.05/edit".to_string()),
                features: Vec::new(),
            },
            performance: Performance {
                success_rate: "88%".to_string(),
                average_speed: "3.2s".to_string(),
                uptime: "99.7%".to_string(),
                cost_per_task: "$0.05".to_string(),
            },
            metadata: AgentMetadata {
                total_deployments: 4123,
                rating: 4.5,
                last_updated: date(2024, 1, 13),
                created_at: date(2023, 5, 18),
                updated_at: date(2024, 1, 13),
            },
            deployment_status: None,
            icon: Some("🤝".to_string()),
            thumbnail: None,
            tags: svec(&["coding", "git", "pair-programming", "local"]),
        },
        Agent {
            id: "agent4rec".to_string(),
            name: "Agent4Rec".to_string(),
            category: AgentCategory::Creative,
            description: "Recommender system simulator with 1,000 LLM-powered generative agents for personalized recommendations.".to_string(),
            features: svec(&[
                "1000 Agents",
                "Personalization",
                "Behavior Simulation",
                "Collaborative Filtering",
                "Recommendation Engine",
                "User Modeling",
            ]),
            capabilities: "Agent4Rec creates personalized recommendations through multi-agent collaboration and user behavior simulation with 1,000 intelligent agents.".to_string(),
            use_cases: svec(&[
                "E-commerce",
                "Content Recommendation",
                "Product Discovery",
                "User Personalization",
                "Marketing",
                "Customer Experience",
            ]),
            version: "1.0.2".to_string(),
            tech_stack: svec(&[
                "GPT-4",
                "Multi-Agent System",
                "Recommendation Algorithms",
                "User Modeling",
                "ML Pipeline",
            ]),
            repository_url: Some("https://github.com/LehengTHU/Agent4Rec".to_string()),
            documentation_url: None,
            is_active: true,
            is_open_source: true,
            pricing: Pricing {
                model: PricingModel::Freemium,
                cost: Some("$0.30/recommendation".to_string()),
                features: Vec::new(),
            },
            performance: Performance {
                success_rate: "93%".to_string(),
                average_speed: "5.8s".to_string(),
                uptime: "99.1%".to_string(),
                cost_per_task: "$0.30".to_string(),
            },
            metadata: AgentMetadata {
                total_deployments: 756,
                rating: 4.6,
                last_updated: date(2024, 1, 9),
                created_at: date(2023, 10, 25),
                updated_at: date(2024, 1, 9),
            },
            deployment_status: None,
            icon: Some("🎯".to_string()),
            thumbnail: None,
            tags: svec(&["recommendations", "personalization", "e-commerce", "ml"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let agents = sample_agents();
        let ids: HashSet<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), agents.len());
        assert_eq!(agents.len(), 5);
    }

    #[test]
    fn catalog_entries_carry_real_counters() {
        let agents = sample_agents();
        let chatdev = agents.iter().find(|a| a.id == "chatdev").unwrap();
        assert_eq!(chatdev.category, AgentCategory::Enterprise);
        assert_eq!(chatdev.metadata.total_deployments, 1234);
        assert!(chatdev.deployment_status.is_none());

        let chemcrow = agents.iter().find(|a| a.id == "chemcrow").unwrap();
        assert_eq!(chemcrow.category, AgentCategory::Research);
        assert_eq!(chemcrow.metadata.rating, 4.7);
    }
}
