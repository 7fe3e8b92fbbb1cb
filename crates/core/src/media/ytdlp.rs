// crates/core/src/media/ytdlp.rs
//! yt-dlp backend: spawns the `yt-dlp` process and parses its JSON output.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::config::YtDlpConfig;
use super::source::MediaSource;
use crate::error::{DownloadError, ExtractError};
use crate::types::PlaylistEntry;

const STDERR_LOG_LIMIT: usize = 500;

/// Media source that shells out to `yt-dlp` (with ffmpeg for transcoding).
pub struct YtDlpSource {
    config: YtDlpConfig,
}

impl YtDlpSource {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    /// Arguments for a metadata-only flat playlist listing.
    fn playlist_args(source: &str) -> Vec<String> {
        vec![
            "--flat-playlist".into(),
            "--dump-single-json".into(),
            "--no-warnings".into(),
            source.into(),
        ]
    }

    /// Arguments for downloading one item as audio into `<dest_stem>.<ext>`.
    fn download_args(&self, item_url: &str, dest_stem: &Path) -> Vec<String> {
        let template = format!(
            "{}.%(ext)s",
            dest_stem.to_string_lossy().replace('%', "%%")
        );
        vec![
            "-f".into(),
            "bestaudio/best".into(),
            "-x".into(),
            "--audio-format".into(),
            self.config.audio_format.clone(),
            "--audio-quality".into(),
            self.config.audio_quality.clone(),
            "--force-overwrites".into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--quiet".into(),
            "-o".into(),
            template,
            item_url.into(),
        ]
    }

    fn command(&self, args: &[String]) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.config.binary);
        cmd.args(args)
            // Null stdin so the child never blocks waiting for input
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new(YtDlpConfig::default())
    }
}

/// Parse the `--dump-single-json` document of a flat playlist.
///
/// Entries that are not objects (yt-dlp emits `null` for unavailable items)
/// become empty entries so the runner can report and skip them by position.
pub fn parse_playlist(json: &str, source: &str) -> Result<Vec<PlaylistEntry>, ExtractError> {
    let doc: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ExtractError::MalformedOutput {
            message: e.to_string(),
        })?;

    let entries = doc
        .get("entries")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ExtractError::NotAPlaylist {
            source_locator: source.to_string(),
        })?;

    Ok(entries
        .iter()
        .map(|v| serde_json::from_value::<PlaylistEntry>(v.clone()).unwrap_or_default())
        .collect())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn resolve_playlist(&self, source: &str) -> Result<Vec<PlaylistEntry>, ExtractError> {
        let tool = self.config.binary.clone();
        let secs = self.config.extract_timeout_secs;
        let t0 = Instant::now();
        tracing::info!(source = %source, "yt-dlp: resolving playlist");

        let output = timeout(
            Duration::from_secs(secs),
            self.command(&Self::playlist_args(source)).output(),
        )
        .await
        .map_err(|_| {
            tracing::error!(elapsed_ms = t0.elapsed().as_millis() as u64, "yt-dlp: playlist listing timed out");
            ExtractError::Timeout {
                tool: tool.clone(),
                secs,
            }
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "yt-dlp: failed to spawn process");
            ExtractError::SpawnFailed {
                tool: tool.clone(),
                message: e.to_string(),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = truncate_chars(stderr.trim(), STDERR_LOG_LIMIT);
            tracing::error!(exit_code = ?output.status.code(), stderr = %stderr, "yt-dlp: playlist listing failed");
            return Err(ExtractError::ToolFailed {
                tool,
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries = parse_playlist(&stdout, source)?;
        tracing::info!(
            entries = entries.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "yt-dlp: playlist resolved"
        );
        Ok(entries)
    }

    async fn download_audio(
        &self,
        item_id: &str,
        dest_stem: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let tool = self.config.binary.clone();
        let secs = self.config.download_timeout_secs;
        let item_url = self.config.item_url(item_id);
        let t0 = Instant::now();
        tracing::debug!(url = %item_url, dest = %dest_stem.display(), "yt-dlp: downloading");

        let output = timeout(
            Duration::from_secs(secs),
            self.command(&self.download_args(&item_url, dest_stem)).output(),
        )
        .await
        .map_err(|_| DownloadError::Timeout {
            tool: tool.clone(),
            secs,
        })?
        .map_err(|e| DownloadError::SpawnFailed {
            tool: tool.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::ToolFailed {
                tool,
                code: output.status.code(),
                stderr: truncate_chars(stderr.trim(), STDERR_LOG_LIMIT),
            });
        }

        let mut produced = dest_stem.as_os_str().to_owned();
        produced.push(".");
        produced.push(&self.config.audio_format);
        let produced = PathBuf::from(produced);
        if !tokio::fs::try_exists(&produced).await.unwrap_or(false) {
            return Err(DownloadError::MissingOutput { path: produced });
        }

        tracing::debug!(
            path = %produced.display(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "yt-dlp: download complete"
        );
        Ok(produced)
    }

    fn audio_extension(&self) -> &str {
        &self.config.audio_format
    }

    fn name(&self) -> &str {
        "yt-dlp"
    }
}
