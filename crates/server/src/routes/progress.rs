// crates/server/src/routes/progress.rs
//! Progress log endpoints.
//!
//! - `GET /progress`        - SSE stream, one event per log line, no end marker
//! - `GET /progress/since`  - JSON snapshot of lines after a cursor (for plain polling)
//! - `GET /send-test-message` - append a diagnostic line

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use playlist_zip_core::ProgressBatch;
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;

use crate::state::AppState;

/// Line appended by `GET /send-test-message`.
pub const TEST_MESSAGE: &str = " Test message from server.";

/// Cursor query parameter shared by the progress endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CursorQuery {
    /// Index of the first line to return; 0 replays the whole log.
    pub cursor: usize,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct StatusResponse {
    pub status: String,
}

/// SSE fields cannot carry carriage returns; newlines split into extra `data:` lines.
fn sse_line(text: &str) -> String {
    text.replace('\r', " ")
}

/// GET /progress - stream progress lines as SSE `data:` events.
///
/// Every `poll_interval` the log is checked and all lines appended since the
/// last check are flushed as one burst. No end-of-stream event is sent: the
/// loop ends when the client goes away (axum drops the stream) or the server
/// shuts down.
pub async fn stream_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CursorQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let progress = Arc::clone(&state.progress);
    let poll_interval = state.poll_interval;
    let shutdown = state.shutdown.clone();

    let stream = async_stream::stream! {
        let mut cursor = query.cursor;
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.cancelled() => break,
            }
            let batch = progress.read_since(cursor);
            cursor = batch.cursor;
            for line in batch.entries {
                yield Ok(Event::default().data(sse_line(&line)));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /progress/since?cursor=N - lines appended at or after `cursor`.
pub async fn progress_since(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CursorQuery>,
) -> Json<ProgressBatch> {
    Json(state.progress.read_since(query.cursor))
}

/// GET /send-test-message - append a fixed line so clients can check their stream.
pub async fn send_test_message(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    state.progress.append(TEST_MESSAGE);
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Build the progress router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/progress", get(stream_progress))
        .route("/progress/since", get(progress_since))
        .route("/send-test-message", get(send_test_message))
}
