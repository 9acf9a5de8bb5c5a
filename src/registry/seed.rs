//! Built-in demo fleet
//!
//! Populates the registry the first time the server starts against an empty
//! database. Later starts leave existing rows untouched.

use crate::error::AppError;
use crate::registry::models::{AgentStatus, NewAgent};
use crate::registry::store::AgentStore;
use tracing::info;

fn agent(
    name: &str,
    status: AgentStatus,
    current_task: Option<&str>,
    capabilities: &[&str],
    progress: i64,
    avatar: &str,
) -> NewAgent {
    NewAgent {
        name: name.to_string(),
        status,
        current_task: current_task.map(str::to_string),
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        progress,
        avatar: Some(avatar.to_string()),
    }
}

fn demo_agents() -> Vec<NewAgent> {
    vec![
        agent(
            "Omni-1",
            AgentStatus::Working,
            Some("Analyzing financial reports for Q4"),
            &["Data Analysis", "Financial Modeling", "Reporting"],
            65,
            "https://i.pravatar.cc/150?u=omni",
        ),
        agent(
            "Coder-X",
            AgentStatus::Idle,
            None,
            &["Python", "JavaScript", "Code Review"],
            0,
            "https://i.pravatar.cc/150?u=coder",
        ),
        agent(
            "SupportBot-Alpha",
            AgentStatus::Working,
            Some("Resolving ticket #49221 - Payment Issue"),
            &["Customer Support", "Ticketing", "Email"],
            32,
            "https://i.pravatar.cc/150?u=support",
        ),
        agent(
            "Vision-Pro",
            AgentStatus::Offline,
            None,
            &["Image Recognition", "Video Processing"],
            0,
            "https://i.pravatar.cc/150?u=vision",
        ),
        agent(
            "Writer-Gpt",
            AgentStatus::Working,
            Some("Drafting blog post: 'The Future of AI'"),
            &["Content Writing", "SEO", "Editing"],
            88,
            "https://i.pravatar.cc/150?u=writer",
        ),
    ]
}

/// Insert the demo fleet when the registry is empty
///
/// A registry with any agents at all, seeded or user-created, is left as is.
pub async fn seed_if_empty(store: &AgentStore) -> Result<(), AppError> {
    if store.count_agents().await? > 0 {
        return Ok(());
    }

    info!("Empty registry, seeding demo agents");
    for agent in demo_agents() {
        store.create_agent(agent).await?;
    }

    Ok(())
}
