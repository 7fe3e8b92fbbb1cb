// crates/server/src/routes/jobs.rs
//! Job submission endpoint.
//!
//! - POST /download - run one playlist download job and return its result

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use playlist_zip_core::{JobRequest, JobResult};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of a successful `POST /download`.
///
/// Carries the job result plus `files` and `zip`, the key names older web
/// clients read.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    #[serde(flatten)]
    pub result: JobResult,
    pub files: Vec<String>,
    pub zip: String,
}

impl From<JobResult> for JobResponse {
    fn from(result: JobResult) -> Self {
        Self {
            files: result.produced_files.clone(),
            zip: result.archive_name.clone(),
            result,
        }
    }
}

/// POST /download - download `[rangeStart, rangeEnd)` of a playlist as audio.
///
/// Responds when the whole batch is done. The job runs on its own task, so a
/// client that disconnects early does not abort it halfway through.
///
/// Returns:
/// - 200 with `{ status, producedFiles, archiveName, files, zip }`
/// - 500 when the playlist cannot be resolved or the archive cannot be written
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JobRequest>,
) -> ApiResult<Json<JobResponse>> {
    tracing::info!(
        source = %request.source,
        range_start = request.range_start,
        range_end = request.range_end,
        "Job submitted"
    );

    let runner = Arc::clone(&state.runner);
    let result = tokio::spawn(async move { runner.run(request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("job task failed: {e}")))??;

    Ok(Json(result.into()))
}

/// Build the jobs router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/download", post(submit_job))
}
