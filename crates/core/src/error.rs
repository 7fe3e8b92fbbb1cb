// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a playlist into entries.
///
/// Any of these is fatal for a job: nothing is downloaded and no archive is written.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to spawn {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    #[error("{tool} exited with status {code:?}: {stderr}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("Malformed playlist metadata: {message}")]
    MalformedOutput { message: String },

    #[error("Source is not a playlist: {source_locator}")]
    NotAPlaylist { source_locator: String },
}

/// Errors from downloading and transcoding a single playlist entry.
///
/// Always recovered by the runner: logged, skipped, batch continues.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to spawn {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    #[error("{tool} exited with status {code:?}: {stderr}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("Expected output file is missing: {path}")]
    MissingOutput { path: PathBuf },
}

/// A stale file in the output directory could not be removed.
#[derive(Debug, Error)]
#[error("Failed to delete {path}: {source}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that can occur while writing the job archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error writing archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error writing archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive task panicked: {0}")]
    Join(String),
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur when looking up a produced file by name.
#[derive(Debug, Error)]
pub enum OutputDirError {
    #[error("File not found: {name}")]
    NotFound { name: String },

    #[error("Invalid file name: {name}")]
    InvalidName { name: String },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputDirError {
    pub fn io(name: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                name: name.to_string(),
            },
            _ => Self::Io {
                path: path.into(),
                source,
            },
        }
    }
}

/// Errors that end a job before it can return a result.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Archive failed: {0}")]
    Archive(#[from] ArchiveError),
}
