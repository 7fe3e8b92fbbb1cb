// crates/server/src/routes/mod.rs
//! API route handlers for the playlist-zip server.

pub mod files;
pub mod health;
pub mod jobs;
pub mod progress;

use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Create the combined router.
///
/// Routes:
/// - POST /download - Run a playlist download job
/// - GET  /progress - SSE stream of progress lines
/// - GET  /progress/since?cursor=N - JSON snapshot of progress lines
/// - GET  /send-test-message - Append a diagnostic progress line
/// - GET  /download-file/{filename} - Download a produced file
/// - GET  /downloads/* - Static view of the output directory
/// - GET  /api/health - Health check
pub fn api_routes(state: Arc<AppState>) -> Router {
    let downloads = ServeDir::new(state.output.path());
    Router::new()
        .merge(jobs::router())
        .merge(progress::router())
        .merge(files::router())
        .nest("/api", health::router())
        .nest_service("/downloads", downloads)
        .with_state(state)
}
