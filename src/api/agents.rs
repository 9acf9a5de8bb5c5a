//! Agent registry API handlers
//!
//! Contains HTTP request handlers for agent CRUD operations. Payloads are
//! validated before they reach the store; the first violation is surfaced
//! to the caller as a `{message, field}` body.

use crate::api::RouterState;
use crate::error::AppError;
use crate::registry::models::Agent;
use crate::registry::{validate_create, validate_update};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

/// Parse the `:id` path segment
///
/// Anything that is not an integer cannot name a stored agent, so it is
/// reported as not-found rather than as a malformed request.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::AgentNotFound(raw.to_string()))
}

/// GET /api/agents - List all agents, ordered by id
pub async fn list_agents(
    State((store, _, _)): State<RouterState>,
) -> Result<Json<Vec<Agent>>, AppError> {
    let agents = store.get_agents().await?;

    Ok(Json(agents))
}

/// GET /api/agents/:id - Get a specific agent
pub async fn get_agent(
    State((store, _, _)): State<RouterState>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, AppError> {
    let id = parse_id(&id)?;
    let agent = store
        .get_agent(id)
        .await?
        .ok_or_else(|| AppError::AgentNotFound(id.to_string()))?;

    Ok(Json(agent))
}

/// POST /api/agents - Create a new agent
pub async fn create_agent(
    State((store, _, _)): State<RouterState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Agent>), AppError> {
    let new_agent = validate_create(&payload).map_err(AppError::validation)?;
    let agent = store.create_agent(new_agent).await?;

    Ok((StatusCode::CREATED, Json(agent)))
}

/// PUT /api/agents/:id - Apply a partial update to an agent
///
/// The body is validated before the id is parsed, so a malformed payload
/// aimed at an unknown id still reports the validation failure.
pub async fn update_agent(
    State((store, _, _)): State<RouterState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Agent>, AppError> {
    let patch = validate_update(&payload).map_err(AppError::validation)?;
    let id = parse_id(&id)?;
    let agent = store
        .update_agent(id, patch)
        .await?
        .ok_or_else(|| AppError::AgentNotFound(id.to_string()))?;

    Ok(Json(agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::DispatcherClient;
    use crate::registry::models::AgentStatus;
    use crate::registry::AgentStore;
    use crate::relay::StateRelay;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn create_test_router_state() -> (RouterState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = AgentStore::new(db_path.to_str().unwrap())
            .await
            .expect("Failed to create test database");

        // The registry handlers never touch the relay or the dispatcher;
        // point them at a closed port so accidental use fails loudly.
        let client = reqwest::Client::new();
        let relay = StateRelay::new(client.clone(), "http://127.0.0.1:9", Duration::from_secs(5));
        let dispatcher = DispatcherClient::new(client, "http://127.0.0.1:9");

        (
            (Arc::new(store), Arc::new(relay), Arc::new(dispatcher)),
            temp_dir,
        )
    }

    #[tokio::test]
    async fn test_list_agents_empty() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let result = list_agents(State(router_state)).await;
        assert!(result.is_ok());
        let agents = result.unwrap().0;
        assert!(agents.is_empty());
    }

    #[tokio::test]
    async fn test_create_agent_returns_created_record() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let payload = json!({
            "name": "Nexus-7",
            "status": "idle",
            "capabilities": ["Code Review"],
        });

        let result = create_agent(State(router_state.clone()), Json(payload)).await;
        assert!(result.is_ok(), "Failed to create agent: {:?}", result.err());
        let (status, Json(agent)) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(agent.name, "Nexus-7");
        assert_eq!(agent.status, AgentStatus::Idle);
        assert_eq!(agent.capabilities, vec!["Code Review"]);
        assert_eq!(agent.progress, 0);
        assert!(agent.id > 0);

        // Verify agent is in list
        let agents = list_agents(State(router_state)).await.unwrap().0;
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, agent.id);
    }

    #[tokio::test]
    async fn test_create_agent_missing_name_flags_field() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let payload = json!({"status": "idle"});

        let result = create_agent(State(router_state), Json(payload)).await;
        match result.unwrap_err() {
            AppError::Validation { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "name is required");
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_agent_not_found() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let result = get_agent(State(router_state), Path("9999".to_string())).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            AppError::AgentNotFound(_) => {}
            other => panic!("Expected AgentNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_agent_non_numeric_id_is_not_found() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let result = get_agent(State(router_state), Path("abc".to_string())).await;
        match result.unwrap_err() {
            AppError::AgentNotFound(id) => assert_eq!(id, "abc"),
            other => panic!("Expected AgentNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let payload = json!({
            "name": "Omni-1",
            "status": "working",
            "currentTask": "Analyzing financial reports for Q4",
            "capabilities": ["Data Analysis", "Reporting"],
            "progress": 65,
            "avatar": "https://i.pravatar.cc/150?u=omni",
        });

        let (_, Json(created)) = create_agent(State(router_state.clone()), Json(payload))
            .await
            .unwrap();
        let Json(fetched) = get_agent(State(router_state), Path(created.id.to_string()))
            .await
            .unwrap();

        // Storage may round the creation instant; every other field is exact
        let mut expected = created.clone();
        expected.last_active = fetched.last_active;
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn test_update_agent_changes_only_named_fields() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let payload = json!({
            "name": "Coder-X",
            "status": "idle",
            "capabilities": ["Python", "JavaScript"],
        });
        let (_, Json(created)) = create_agent(State(router_state.clone()), Json(payload))
            .await
            .unwrap();

        let result = update_agent(
            State(router_state),
            Path(created.id.to_string()),
            Json(json!({"progress": 50})),
        )
        .await;

        let Json(updated) = result.unwrap();
        assert_eq!(updated.progress, 50);
        assert_eq!(updated.name, "Coder-X");
        assert_eq!(updated.status, AgentStatus::Idle);
        assert_eq!(updated.capabilities, vec!["Python", "JavaScript"]);
        assert_eq!(updated.last_active, created.last_active);
    }

    #[tokio::test]
    async fn test_update_agent_not_found() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let result = update_agent(
            State(router_state),
            Path("9999".to_string()),
            Json(json!({"progress": 50})),
        )
        .await;

        match result.unwrap_err() {
            AppError::AgentNotFound(_) => {}
            other => panic!("Expected AgentNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_validation_wins_over_bad_id() {
        let (router_state, _temp_dir) = create_test_router_state().await;
        let result = update_agent(
            State(router_state),
            Path("not-a-number".to_string()),
            Json(json!({"status": "running"})),
        )
        .await;

        // Body validation runs before the id parse
        match result.unwrap_err() {
            AppError::Validation { field, .. } => assert_eq!(field, "status"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}
