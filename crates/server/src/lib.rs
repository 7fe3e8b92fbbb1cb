// crates/server/src/lib.rs
//! playlist-zip server library.
//!
//! This crate provides the Axum-based HTTP server that runs playlist download
//! jobs, streams their progress over SSE and serves the produced files.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS layer for a single allowed origin, or any origin for `*`.
///
/// An origin that is not a valid header value allows nothing.
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = if allowed_origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(allowed_origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!(origin = %allowed_origin, error = %e, "Invalid CORS origin; cross-origin requests disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - Job, progress and file routes
/// - CORS restricted to `allowed_origin`
/// - Request tracing
pub fn create_app(state: Arc<AppState>, allowed_origin: &str) -> Router {
    Router::new()
        .merge(api_routes(state))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
