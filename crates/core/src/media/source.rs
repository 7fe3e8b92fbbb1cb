// crates/core/src/media/source.rs
//! MediaSource trait defining the interface for playlist extraction backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{DownloadError, ExtractError};
use crate::types::PlaylistEntry;

/// Backend able to list a playlist and turn one of its items into an audio file.
///
/// Implementations include:
/// - `YtDlpSource` - spawns the `yt-dlp` binary
/// - scripted fakes in tests
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve `source` into its entries without downloading any media.
    async fn resolve_playlist(&self, source: &str) -> Result<Vec<PlaylistEntry>, ExtractError>;

    /// Download and transcode one item.
    ///
    /// The produced file is `dest_stem` with `audio_extension()` appended;
    /// its path is returned on success.
    async fn download_audio(&self, item_id: &str, dest_stem: &Path)
        -> Result<PathBuf, DownloadError>;

    /// Extension (without dot) of the files `download_audio` produces.
    fn audio_extension(&self) -> &str {
        "mp3"
    }

    /// Backend name for logging.
    fn name(&self) -> &str;
}
