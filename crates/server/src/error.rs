// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playlist_zip_core::{ArchiveError, JobError, OutputDirError};
use serde::Serialize;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Job failed: {0}")]
    Job(#[from] JobError),

    #[error("Output file error: {0}")]
    OutputFile(#[from] OutputDirError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::Job(JobError::Extraction(e)) => {
                tracing::error!(error = %e, "Playlist extraction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details(
                        "Extraction failed",
                        format!(
                            "Failed to extract playlist info, check if the playlist URL is correct: {e}"
                        ),
                    ),
                )
            }
            ApiError::Job(JobError::Archive(e)) => {
                match e {
                    ArchiveError::Io { path, source } => {
                        tracing::error!(path = %path.display(), error = %source, "Archive IO error");
                    }
                    ArchiveError::Zip { path, source } => {
                        tracing::error!(path = %path.display(), error = %source, "Archive zip error");
                    }
                    ArchiveError::Join(msg) => {
                        tracing::error!(message = %msg, "Archive task failed");
                    }
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Failed to create archive"),
                )
            }
            ApiError::OutputFile(file_err) => match file_err {
                OutputDirError::NotFound { name } => {
                    tracing::warn!(file = %name, "Requested file not found");
                    (
                        StatusCode::NOT_FOUND,
                        ErrorResponse::with_details("File not found", format!("File: {name}")),
                    )
                }
                OutputDirError::InvalidName { name } => {
                    tracing::warn!(file = %name, "Rejected file name");
                    (
                        StatusCode::BAD_REQUEST,
                        ErrorResponse::with_details("Invalid file name", format!("File: {name}")),
                    )
                }
                OutputDirError::Io { path, source } => {
                    tracing::error!(path = %path.display(), error = %source, "IO error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::new("IO error reading file"),
                    )
                }
            },
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
