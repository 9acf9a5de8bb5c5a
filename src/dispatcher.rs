//! Dispatcher proxy client
//!
//! Forwards chat messages and task commands to the orchestrator webhook and
//! relays its JSON replies verbatim. Beyond filling request defaults the
//! server never interprets these payloads; the dashboard and the
//! orchestrator own that contract.

use crate::error::AppError;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

fn default_task_type() -> String {
    "general".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

/// Chat message bound for the orchestrator
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Free-form message text
    pub message: String,
    /// Routing hint, defaults to "general"
    #[serde(default = "default_task_type")]
    pub task_type: String,
    /// Scheduling hint, defaults to "medium"
    #[serde(default = "default_priority")]
    pub priority: String,
}

/// Task creation command bound for the orchestrator
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Kind of task the orchestrator should run
    pub task_type: String,
    /// Problem description
    pub issue: String,
    /// Scheduling hint, defaults to "medium"
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Optional urgency marker, omitted from the forwarded payload when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Value>,
}

/// Status transition for an existing task
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatusRequest {
    /// New task status
    pub status: String,
    /// Optional task result payload, omitted when absent
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

/// HTTP client for the orchestrator webhook
///
/// The base URL is injected so tests can point it at a local mock server.
pub struct DispatcherClient {
    client: reqwest::Client,
    base_url: String,
}

impl DispatcherClient {
    /// Create a client rooted at the orchestrator webhook base URL
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Forward a chat message to `{base_url}/chat`
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<Value, AppError> {
        debug!(
            task_type = %request.task_type,
            priority = %request.priority,
            "Forwarding chat message to orchestrator"
        );
        self.post_json("/chat", request).await
    }

    /// Forward a task creation command to `{base_url}/tasks`
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Value, AppError> {
        debug!(task_type = %request.task_type, "Forwarding task creation to orchestrator");
        self.post_json("/tasks", request).await
    }

    /// Fetch a task from `{base_url}/tasks/{id}`
    pub async fn task_status(&self, task_id: &str) -> Result<Value, AppError> {
        self.get_json(&format!("/tasks/{}", task_id)).await
    }

    /// Forward a status transition to `{base_url}/tasks/{id}/status`
    pub async fn update_task_status(
        &self,
        task_id: &str,
        request: &UpdateTaskStatusRequest,
    ) -> Result<Value, AppError> {
        debug!(task_id = %task_id, status = %request.status, "Forwarding task status update");
        self.put_json(&format!("/tasks/{}/status", task_id), request)
            .await
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach orchestrator: {}", e)))?;

        relay_response(response).await
    }

    async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach orchestrator: {}", e)))?;

        relay_response(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach orchestrator: {}", e)))?;

        relay_response(response).await
    }
}

/// Turn an orchestrator reply into the JSON value we relay to the caller
async fn relay_response(response: reqwest::Response) -> Result<Value, AppError> {
    let status = response.status();
    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        return Err(AppError::Upstream(format!(
            "Orchestrator returned status {}: {}",
            status.as_u16(),
            error_body
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::Internal(anyhow!("Failed to read orchestrator response: {}", e)))?;

    serde_json::from_str(&body).map_err(|e| {
        AppError::Upstream(format!("Invalid JSON from orchestrator: {} - Body: {}", e, body))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    fn client_for(server: &Server) -> DispatcherClient {
        DispatcherClient::new(reqwest::Client::new(), server.url())
    }

    #[tokio::test]
    #[serial]
    async fn test_send_chat_fills_defaults() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "message": "Hello",
                "taskType": "general",
                "priority": "medium",
            })))
            .with_status(200)
            .with_body(r#"{"reply": "Hi there"}"#)
            .create_async()
            .await;

        // Deserialization applies the defaults, exactly as the HTTP layer does
        let request: ChatRequest = serde_json::from_value(json!({"message": "Hello"})).unwrap();
        let reply = client_for(&server).send_chat(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, json!({"reply": "Hi there"}));
    }

    #[tokio::test]
    #[serial]
    async fn test_send_chat_relays_reply_verbatim() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body(r#"{"reply": "ok", "trace": {"hops": [1, 2]}, "unknownField": null}"#)
            .create_async()
            .await;

        let request: ChatRequest =
            serde_json::from_value(json!({"message": "Hello", "taskType": "support"})).unwrap();
        let reply = client_for(&server).send_chat(&request).await.unwrap();

        assert_eq!(
            reply,
            json!({"reply": "ok", "trace": {"hops": [1, 2]}, "unknownField": null})
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_create_task_omits_absent_urgency() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/tasks")
            .match_body(Matcher::Json(json!({
                "taskType": "support",
                "issue": "Printer on fire",
                "priority": "medium",
            })))
            .with_status(200)
            .with_body(r#"{"taskId": "t-1", "status": "queued"}"#)
            .create_async()
            .await;

        let request: CreateTaskRequest = serde_json::from_value(json!({
            "taskType": "support",
            "issue": "Printer on fire",
        }))
        .unwrap();
        let reply = client_for(&server).create_task(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply["taskId"], "t-1");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_task_forwards_urgency() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/tasks")
            .match_body(Matcher::Json(json!({
                "taskType": "support",
                "issue": "Printer on fire",
                "priority": "high",
                "urgency": "critical",
            })))
            .with_status(200)
            .with_body(r#"{"taskId": "t-2"}"#)
            .create_async()
            .await;

        let request: CreateTaskRequest = serde_json::from_value(json!({
            "taskType": "support",
            "issue": "Printer on fire",
            "priority": "high",
            "urgency": "critical",
        }))
        .unwrap();
        client_for(&server).create_task(&request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_task_status_fetches_task() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/tasks/t-42")
            .with_status(200)
            .with_body(r#"{"taskId": "t-42", "status": "running"}"#)
            .create_async()
            .await;

        let reply = client_for(&server).task_status("t-42").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply["status"], "running");
    }

    #[tokio::test]
    #[serial]
    async fn test_update_task_status_puts_to_task_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/tasks/t-42/status")
            .match_body(Matcher::Json(json!({
                "status": "resolved",
                "result": {"ok": true},
            })))
            .with_status(200)
            .with_body(r#"{"updated": true}"#)
            .create_async()
            .await;

        let request: UpdateTaskStatusRequest = serde_json::from_value(json!({
            "status": "resolved",
            "result": {"ok": true},
        }))
        .unwrap();
        let reply = client_for(&server)
            .update_task_status("t-42", &request)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, json!({"updated": true}));
    }

    #[tokio::test]
    #[serial]
    async fn test_error_status_collapses_to_upstream() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let request: ChatRequest = serde_json::from_value(json!({"message": "Hello"})).unwrap();
        let result = client_for(&server).send_chat(&request).await;

        mock.assert_async().await;
        let error = result.unwrap_err();
        assert!(matches!(error, AppError::Upstream(_)));
        let message = error.to_string();
        assert!(message.contains("503"), "got: {}", message);
        assert!(message.contains("overloaded"), "got: {}", message);
    }

    #[tokio::test]
    #[serial]
    async fn test_non_json_reply_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body("<html>proxy error page</html>")
            .create_async()
            .await;

        let request: ChatRequest = serde_json::from_value(json!({"message": "Hello"})).unwrap();
        let result = client_for(&server).send_chat(&request).await;

        let error = result.unwrap_err().to_string();
        assert!(error.contains("Invalid JSON"), "got: {}", error);
    }

    #[test]
    fn chat_request_serializes_camel_case() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            task_type: "support".to_string(),
            priority: "high".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({"message": "Hello", "taskType": "support", "priority": "high"})
        );
    }
}
