// crates/server/src/routes/files.rs
//! Produced-file download endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use playlist_zip_core::OutputDirError;
use tokio_util::io::ReaderStream;

use crate::error::ApiResult;
use crate::state::AppState;

/// `Content-Disposition` suggesting `name` as the save name.
///
/// Carries an ASCII fallback plus the RFC 5987 UTF-8 form for non-ASCII titles.
fn attachment_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(name)
    )
}

/// GET /download-file/{filename} - stream a file from the output directory.
///
/// Returns 404 when the file does not exist and 400 for names that are not
/// a single plain path component.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = state.output.resolve(&filename).await?;
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| OutputDirError::io(&filename, &path, e))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| OutputDirError::io(&filename, &path, e))?
        .len();

    tracing::info!(file = %filename, bytes = len, "Serving produced file");

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// Build the files router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/download-file/{filename}", get(download_file))
}
