//! Agent registry module
//!
//! Stores the agent fleet in SQLite and validates every payload before it
//! reaches the database.

pub mod models;
pub mod seed;
pub mod store;
pub mod validate;

pub use models::{Agent, AgentPatch, AgentStatus, NewAgent};
pub use seed::seed_if_empty;
pub use store::AgentStore;
pub use validate::{validate_create, validate_update, Violation};
