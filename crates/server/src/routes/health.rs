// crates/server/src/routes/health.rs
//! Health check endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Response for `GET /api/health`.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "uptime_secs")]
    pub uptime_secs: u64,
    /// Name of the media tool jobs download through.
    pub media_source: String,
    pub job_running: bool,
    pub progress_lines: usize,
}

/// GET /api/health - server status plus job and progress-log counters.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        media_source: state.runner.media_name().to_string(),
        job_running: state.runner.is_busy(),
        progress_lines: state.progress.len(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
