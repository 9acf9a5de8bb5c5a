//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::registry::validate::Violation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request payload failed schema validation
    #[error("{message}")]
    Validation {
        /// Wire name of the offending field
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// Agent with the given ID was not found
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// The orchestrator webhook was unreachable or answered badly
    #[error("{0}")]
    Upstream(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a validation error from the first recorded violation
    ///
    /// Validators report every violation in schema order; the HTTP surface
    /// exposes only the first one.
    pub fn validation(violations: Vec<Violation>) -> Self {
        let first = violations.into_iter().next().unwrap_or(Violation {
            field: "",
            message: "invalid payload".to_string(),
        });

        AppError::Validation {
            field: first.field.to_string(),
            message: first.message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // The dashboard keys off `message` and `field` for inline form errors
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": message,
                    "field": field,
                }),
            ),
            AppError::AgentNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": self.to_string(),
                    "status": StatusCode::NOT_FOUND.as_u16(),
                }),
            ),
            // Upstream failures are relayed with a bare `error` key
            AppError::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": message,
                }),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": self.to_string(),
                    "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_uses_first_violation() {
        let violations = vec![
            Violation {
                field: "name",
                message: "name is required".to_string(),
            },
            Violation {
                field: "status",
                message: "status is required".to_string(),
            },
        ];

        let error = AppError::validation(violations);
        match error {
            AppError::Validation { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "name is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn not_found_message_includes_requested_id() {
        let error = AppError::AgentNotFound("42".to_string());
        assert_eq!(error.to_string(), "Agent not found: 42");
    }
}
