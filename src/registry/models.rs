//! Agent registry data models
//!
//! Defines the persistent Agent record plus the validated payload shapes
//! accepted by the store for creation and partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is online but has no task assigned
    Idle,
    /// Agent is actively working on a task
    Working,
    /// Agent is not reachable
    Offline,
    /// Agent reported a failure
    Error,
}

impl AgentStatus {
    /// Convert the status to its string representation
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Working => "working",
            AgentStatus::Offline => "offline",
            AgentStatus::Error => "error",
        }
    }

    /// Parse a status string; returns `None` for anything outside the enum
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(AgentStatus::Idle),
            "working" => Some(AgentStatus::Working),
            "offline" => Some(AgentStatus::Offline),
            "error" => Some(AgentStatus::Error),
            _ => None,
        }
    }
}

/// A monitored agent as stored in the registry
///
/// `id` and `last_active` are assigned by the store at creation time and
/// never change afterwards; updates only touch the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Store-assigned unique identifier
    pub id: i64,
    /// Display name of the agent
    pub name: String,
    /// Current lifecycle status
    pub status: AgentStatus,
    /// Unit of work in progress, if any
    pub current_task: Option<String>,
    /// Capability badges, in display order
    pub capabilities: Vec<String>,
    /// Task progress; conventionally 0-100 but not bounded by the store
    pub progress: i64,
    /// Avatar URL, if any
    pub avatar: Option<String>,
    /// First-seen marker stamped at creation
    pub last_active: DateTime<Utc>,
}

/// Validated payload accepted by the store when inserting a new agent
#[derive(Debug, Clone, PartialEq)]
pub struct NewAgent {
    /// Display name, non-empty
    pub name: String,
    /// Initial lifecycle status
    pub status: AgentStatus,
    /// Unit of work in progress, if any
    pub current_task: Option<String>,
    /// Capability badges, in display order
    pub capabilities: Vec<String>,
    /// Initial progress value
    pub progress: i64,
    /// Avatar URL, if any
    pub avatar: Option<String>,
}

/// Validated partial update
///
/// `None` leaves the stored field untouched. The nullable columns use a
/// nested `Option` so "set to null" (`Some(None)`) stays distinguishable
/// from "not present in the payload" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentPatch {
    /// Replacement name
    pub name: Option<String>,
    /// Replacement status
    pub status: Option<AgentStatus>,
    /// Replacement current task (`Some(None)` clears it)
    pub current_task: Option<Option<String>>,
    /// Replacement capability list
    pub capabilities: Option<Vec<String>>,
    /// Replacement progress value
    pub progress: Option<i64>,
    /// Replacement avatar URL (`Some(None)` clears it)
    pub avatar: Option<Option<String>>,
}
