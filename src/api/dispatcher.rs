//! Dispatcher proxy endpoints
//!
//! Thin handlers that forward chat and task requests to the orchestrator
//! webhook and relay its JSON replies verbatim. Request defaults are filled
//! during deserialization; everything else is the orchestrator's contract
//! with the dashboard.

use crate::api::RouterState;
use crate::dispatcher::{ChatRequest, CreateTaskRequest, UpdateTaskStatusRequest};
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

/// POST /api/dispatcher/chat - Forward a chat message to the orchestrator
pub async fn send_chat(
    State((_, _, dispatcher)): State<RouterState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let reply = dispatcher.send_chat(&request).await?;

    Ok(Json(reply))
}

/// POST /api/tasks/create - Forward a task creation command
pub async fn create_task(
    State((_, _, dispatcher)): State<RouterState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let task = dispatcher.create_task(&request).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/:id - Fetch one task from the orchestrator
///
/// The chat UI polls this to follow a task it kicked off via chat.
pub async fn get_task(
    State((_, _, dispatcher)): State<RouterState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let task = dispatcher.task_status(&id).await?;

    Ok(Json(task))
}

/// PUT /api/tasks/:id/status - Forward a task status transition
pub async fn update_task_status(
    State((_, _, dispatcher)): State<RouterState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let reply = dispatcher.update_task_status(&id, &request).await?;

    Ok(Json(reply))
}
