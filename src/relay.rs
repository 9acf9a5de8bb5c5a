//! External state relay
//!
//! Polls the orchestrator webhook on a fixed interval and hands each JSON
//! snapshot to the subscriber that requested it. Every subscriber owns its
//! own poll task; dropping the [`Subscription`] aborts that task, so a
//! disconnected client stops generating upstream traffic immediately.

use crate::error::AppError;
use anyhow::anyhow;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Fan-out source for orchestrator state snapshots
pub struct StateRelay {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

/// One subscriber's live feed of state snapshots
///
/// Holds the snapshot channel and the handle of the poll task feeding it.
/// Dropping the subscription aborts the task.
pub struct Subscription {
    events: UnboundedReceiver<String>,
    poller: JoinHandle<()>,
}

impl Subscription {
    /// Wait for the next snapshot
    ///
    /// Returns `None` once the poll task has stopped and the channel drained.
    pub async fn next_event(&mut self) -> Option<String> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.poller.abort();
        debug!("State subscriber dropped, poll task aborted");
    }
}

impl StateRelay {
    /// Create a relay polling `{base_url}/state` every `poll_interval`
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            poll_interval,
        }
    }

    /// Attach a subscriber and start polling on its behalf
    ///
    /// The first snapshot is fetched immediately, later ones on the interval.
    /// A failed poll is logged and skipped; the task keeps running so the
    /// subscriber picks up again once the orchestrator recovers.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let url = format!("{}/state", self.base_url);
        let poll_interval = self.poll_interval;

        let poller = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match fetch_state(&client, &url).await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            // Receiver gone, subscriber disconnected
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("State poll failed: {}", e);
                    }
                }
            }
        });

        info!("State subscriber attached");
        Subscription { events: rx, poller }
    }
}

/// Fetch one state snapshot from the orchestrator
///
/// The body must parse as JSON; it is re-serialized in compact form so a
/// snapshot always fits a single SSE data line.
async fn fetch_state(client: &reqwest::Client, url: &str) -> Result<String, AppError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to reach orchestrator: {}", e)))?;

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

    let snapshot: Value = serde_json::from_str(&body).map_err(|e| {
        AppError::Upstream(format!("Invalid JSON from orchestrator: {} - Body: {}", e, body))
    })?;

    Ok(snapshot.to_string())
}
