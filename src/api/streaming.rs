//! Streaming utilities for Server-Sent Events (SSE)
//!
//! Wraps a relay subscription into the event-stream response the dashboard
//! listens on for live orchestrator state.

use crate::api::RouterState;
use crate::error::AppError;
use crate::relay::Subscription;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures_util::{stream::Stream, StreamExt};

/// GET /api/sse/state - Stream orchestrator state snapshots
///
/// Opens a dedicated relay subscription for this client: one snapshot is
/// pushed right away, then one per poll interval. The response body owns the
/// subscription, so when the client disconnects the body is dropped and the
/// subscriber's poll task is aborted with it.
pub async fn state_stream(State((_, relay, _)): State<RouterState>) -> Result<Response, AppError> {
    let subscription = relay.subscribe();
    let stream = snapshot_stream(subscription);

    let sse_stream =
        stream.map(|snapshot| Ok::<_, std::io::Error>(format!("data: {}\n\n", snapshot)));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

/// Yield snapshots until the subscription's poll task stops
///
/// Failed poll cycles never reach the channel, so nothing is emitted for
/// them; the stream simply stays quiet until the next successful fetch.
fn snapshot_stream(mut subscription: Subscription) -> impl Stream<Item = String> {
    use async_stream::stream;

    stream! {
        while let Some(snapshot) = subscription.next_event().await {
            yield snapshot;
        }
    }
}
