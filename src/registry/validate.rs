//! Payload validation for the Registry API
//!
//! One explicit function per operation, each taking the raw JSON body and
//! returning either a normalized payload or the full ordered list of
//! field-level violations. Validation is pure: no store access, identical
//! input always produces the identical result.
//!
//! Field order in the violation list follows the schema: name, status,
//! currentTask, capabilities, progress, avatar. The Registry API surfaces
//! only the first entry to the caller.

use crate::registry::models::{AgentPatch, AgentStatus, NewAgent};
use serde_json::Value;

/// A single field-level validation failure
///
/// `field` is the wire name of the offending field; the empty string marks
/// a violation against the payload as a whole (e.g. a non-object body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Wire name of the field that failed
    pub field: &'static str,
    /// Human-readable reason
    pub message: String,
}

fn required(field: &'static str) -> Violation {
    Violation {
        field,
        message: format!("{} is required", field),
    }
}

fn invalid(field: &'static str, expected: &str) -> Violation {
    Violation {
        field,
        message: format!("{} must be {}", field, expected),
    }
}

fn not_an_object() -> Vec<Violation> {
    vec![Violation {
        field: "",
        message: "expected a JSON object".to_string(),
    }]
}

/// Validate a creation payload
///
/// Requires `name` (non-empty string) and `status` (one of the four
/// enumerated values). `capabilities` defaults to an empty list and
/// `progress` to 0 when absent. Unknown fields are ignored.
pub fn validate_create(input: &Value) -> Result<NewAgent, Vec<Violation>> {
    let Some(object) = input.as_object() else {
        return Err(not_an_object());
    };

    let mut violations = Vec::new();

    let name = match object.get("name") {
        None => {
            violations.push(required("name"));
            None
        }
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value.clone()),
        Some(_) => {
            violations.push(invalid("name", "a non-empty string"));
            None
        }
    };

    let status = match object.get("status") {
        None => {
            violations.push(required("status"));
            None
        }
        Some(Value::String(value)) => match AgentStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                violations.push(invalid("status", "one of idle, working, offline, error"));
                None
            }
        },
        Some(_) => {
            violations.push(invalid("status", "one of idle, working, offline, error"));
            None
        }
    };

    let current_task = match object.get("currentTask") {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            violations.push(invalid("currentTask", "a string or null"));
            None
        }
    };

    let capabilities = match object.get("capabilities") {
        None => Vec::new(),
        Some(value) => match string_array(value) {
            Some(list) => list,
            None => {
                violations.push(invalid("capabilities", "an array of strings"));
                Vec::new()
            }
        },
    };

    let progress = match object.get("progress") {
        None => 0,
        Some(value) => match value.as_i64() {
            Some(progress) => progress,
            None => {
                violations.push(invalid("progress", "an integer"));
                0
            }
        },
    };

    let avatar = match object.get("avatar") {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            violations.push(invalid("avatar", "a string or null"));
            None
        }
    };

    match (name, status) {
        (Some(name), Some(status)) if violations.is_empty() => Ok(NewAgent {
            name,
            status,
            current_task,
            capabilities,
            progress,
            avatar,
        }),
        _ => Err(violations),
    }
}

/// Validate a partial-update payload
///
/// Every field is optional; fields present are checked by the same rules as
/// creation. `currentTask` and `avatar` accept JSON null to clear the stored
/// value. Unknown fields, including the immutable `id` and `lastActive`, are
/// ignored rather than rejected.
pub fn validate_update(input: &Value) -> Result<AgentPatch, Vec<Violation>> {
    let Some(object) = input.as_object() else {
        return Err(not_an_object());
    };

    let mut violations = Vec::new();
    let mut patch = AgentPatch::default();

    match object.get("name") {
        None => {}
        Some(Value::String(value)) if !value.trim().is_empty() => {
            patch.name = Some(value.clone());
        }
        Some(_) => violations.push(invalid("name", "a non-empty string")),
    }

    match object.get("status") {
        None => {}
        Some(Value::String(value)) => match AgentStatus::parse(value) {
            Some(status) => patch.status = Some(status),
            None => violations.push(invalid("status", "one of idle, working, offline, error")),
        },
        Some(_) => violations.push(invalid("status", "one of idle, working, offline, error")),
    }

    match object.get("currentTask") {
        None => {}
        Some(Value::Null) => patch.current_task = Some(None),
        Some(Value::String(value)) => patch.current_task = Some(Some(value.clone())),
        Some(_) => violations.push(invalid("currentTask", "a string or null")),
    }

    match object.get("capabilities") {
        None => {}
        Some(value) => match string_array(value) {
            Some(list) => patch.capabilities = Some(list),
            None => violations.push(invalid("capabilities", "an array of strings")),
        },
    }

    match object.get("progress") {
        None => {}
        Some(value) => match value.as_i64() {
            Some(progress) => patch.progress = Some(progress),
            None => violations.push(invalid("progress", "an integer")),
        },
    }

    match object.get("avatar") {
        None => {}
        Some(Value::Null) => patch.avatar = Some(None),
        Some(Value::String(value)) => patch.avatar = Some(Some(value.clone())),
        Some(_) => violations.push(invalid("avatar", "a string or null")),
    }

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(violations)
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    let mut list = Vec::with_capacity(items.len());
    for item in items {
        list.push(item.as_str()?.to_string());
    }
    Some(list)
}
