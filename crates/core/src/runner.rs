// crates/core/src/runner.rs
//! Sequential batch job runner.
//!
//! One job: pre-clean the output directory, resolve the playlist, download
//! the requested slice one entry at a time, then bundle whatever succeeded
//! into a single archive. Progress is reported to a shared `ProgressLog`.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::Instrument;

use crate::archive::{archive_name, write_zip_async};
use crate::error::JobError;
use crate::media::{claim_stem, output_stem, MediaSource};
use crate::output_dir::OutputDir;
use crate::progress_log::ProgressLog;
use crate::types::{JobRequest, JobResult, JobStatus, PlaylistEntry};

/// Terminal progress line appended once per job that got past extraction.
pub const BATCH_COMPLETE_MESSAGE: &str = "Downloading complete";

/// Clamp a half-open `[start, end)` request to a sequence of length `len`.
///
/// Bounds past the end truncate; `start > end` yields an empty range.
pub fn slice_range(len: usize, start: usize, end: usize) -> Range<usize> {
    let end = end.min(len);
    let start = start.min(end);
    start..end
}

/// Runs playlist download jobs to completion, one at a time.
///
/// The runner owns no per-job state beyond the admission lock; each call to
/// [`run`](Self::run) returns its result and keeps nothing.
pub struct BatchJobRunner {
    media: Arc<dyn MediaSource>,
    output: OutputDir,
    progress: Arc<ProgressLog>,
    admission: Mutex<()>,
}

/// What happened to a single entry of the slice.
enum EntryOutcome {
    Produced(String),
    Failed,
}

impl BatchJobRunner {
    pub fn new(media: Arc<dyn MediaSource>, output: OutputDir, progress: Arc<ProgressLog>) -> Self {
        Self {
            media,
            output,
            progress,
            admission: Mutex::new(()),
        }
    }

    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    pub fn progress(&self) -> &Arc<ProgressLog> {
        &self.progress
    }

    pub fn media_name(&self) -> &str {
        self.media.name()
    }

    /// True while a job holds the admission lock.
    pub fn is_busy(&self) -> bool {
        self.admission.try_lock().is_err()
    }

    /// Execute one job end to end.
    ///
    /// Concurrent callers are queued: a second job starts only after the
    /// first has returned. Only extraction and archive writing are fatal;
    /// per-entry failures are reported to the progress log and skipped.
    pub async fn run(&self, request: JobRequest) -> Result<JobResult, JobError> {
        let _admitted = self.admission.lock().await;
        let span = tracing::info_span!(
            "job",
            source = %request.source,
            range_start = request.range_start,
            range_end = request.range_end,
        );
        self.run_admitted(request).instrument(span).await
    }

    async fn run_admitted(&self, request: JobRequest) -> Result<JobResult, JobError> {
        let cleanup = self.output.clear().await;
        if !cleanup.failures.is_empty() {
            tracing::warn!(failures = cleanup.failures.len(), "pre-clean left stale files behind");
        }

        let entries = match self.media.resolve_playlist(&request.source).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(backend = self.media.name(), error = %e, "playlist extraction failed");
                return Err(JobError::Extraction(e));
            }
        };

        let range = slice_range(entries.len(), request.range_start, request.range_end);
        let slice = &entries[range];
        let total = slice.len();
        tracing::info!(playlist_len = entries.len(), selected = total, "playlist resolved");

        let mut produced_files = Vec::with_capacity(total);
        let mut used_stems = HashSet::with_capacity(total);
        for (i, entry) in slice.iter().enumerate() {
            let position = i + 1;
            if let EntryOutcome::Produced(file_name) =
                self.process_entry(entry, position, total, &mut used_stems).await
            {
                produced_files.push(file_name);
            }
        }
        self.progress.append(BATCH_COMPLETE_MESSAGE);

        let archived = self.archivable(&produced_files).await;
        let name = archive_name(&chrono::Local::now());
        let archive_name =
            write_zip_async(self.output.path().to_path_buf(), name, archived).await?;

        tracing::info!(
            produced = produced_files.len(),
            failed = total - produced_files.len(),
            archive = %archive_name,
            "job complete"
        );

        Ok(JobResult {
            status: JobStatus::Ok,
            produced_files,
            archive_name,
        })
    }

    /// Announce, download and report one entry.
    ///
    /// Appends exactly one `Downloading` line when a download is attempted
    /// and at most one `Failed` line; a skipped entry gets only the failure line.
    /// Repeated titles within one job get distinct file names from `used_stems`.
    async fn process_entry(
        &self,
        entry: &PlaylistEntry,
        position: usize,
        total: usize,
        used_stems: &mut HashSet<String>,
    ) -> EntryOutcome {
        let label = entry.label(position);

        let Some(item_id) = entry.id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::warn!(position, total, label = %label, "entry has no id; skipping");
            self.progress
                .append(format!("Failed to download {label} ({position}/{total})"));
            return EntryOutcome::Failed;
        };

        let Some(base_stem) = entry.title.as_deref().and_then(output_stem) else {
            tracing::warn!(position, total, id = %item_id, "entry has no usable title; skipping");
            self.progress
                .append(format!("Failed to download {label} ({position}/{total})"));
            return EntryOutcome::Failed;
        };

        let stem = claim_stem(&base_stem, used_stems);

        self.progress
            .append(format!("Downloading {label} ({position}/{total})"));

        let dest_stem = self.output.path().join(&stem);
        match self.media.download_audio(item_id, &dest_stem).await {
            Ok(path) => {
                let file_name = format!("{stem}.{}", self.media.audio_extension());
                tracing::info!(position, total, file = %file_name, path = %path.display(), "entry downloaded");
                EntryOutcome::Produced(file_name)
            }
            Err(e) => {
                tracing::warn!(position, total, id = %item_id, error = %e, "entry download failed");
                self.progress
                    .append(format!("Failed to download {label} ({position}/{total})"));
                EntryOutcome::Failed
            }
        }
    }

    /// Produced files that carry the audio extension and are present on disk.
    async fn archivable(&self, produced: &[String]) -> Vec<String> {
        let suffix = format!(".{}", self.media.audio_extension());
        let mut files = Vec::with_capacity(produced.len());
        for name in produced {
            if !name.ends_with(&suffix) {
                continue;
            }
            if self.output.contains_file(name).await {
                files.push(name.clone());
            } else {
                tracing::warn!(file = %name, "produced file vanished before archiving");
            }
        }
        files
    }
}
