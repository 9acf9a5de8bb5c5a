//! API module
//!
//! Contains HTTP request handlers for the agent registry, the live state
//! stream, and the dispatcher proxy endpoints.

pub mod agents;
pub mod dispatcher;
pub mod streaming;

use crate::dispatcher::DispatcherClient;
use crate::registry::AgentStore;
use crate::relay::StateRelay;
use std::sync::Arc;

/// Shared state handed to every route
///
/// Built once in `main` at wiring time and cloned by axum per request:
/// the agent store, the state relay, and the dispatcher client.
pub type RouterState = (Arc<AgentStore>, Arc<StateRelay>, Arc<DispatcherClient>);
