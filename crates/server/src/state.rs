// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use playlist_zip_core::{BatchJobRunner, MediaSource, OutputDir, ProgressLog};
use tokio_util::sync::CancellationToken;

/// Default interval between progress-log checks for SSE clients.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Progress lines visible to every poller, for the lifetime of the process.
    pub progress: Arc<ProgressLog>,
    /// Job runner; admits one job at a time.
    pub runner: Arc<BatchJobRunner>,
    /// Output directory for produced audio files and archives.
    pub output: OutputDir,
    /// How long each SSE loop sleeps between progress checks.
    pub poll_interval: Duration,
    /// Cancelled on server shutdown so open SSE streams end.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(media: Arc<dyn MediaSource>, output: OutputDir) -> Arc<Self> {
        Self::with_poll_interval(media, output, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        media: Arc<dyn MediaSource>,
        output: OutputDir,
        poll_interval: Duration,
    ) -> Arc<Self> {
        let progress = Arc::new(ProgressLog::new());
        let runner = Arc::new(BatchJobRunner::new(
            media,
            output.clone(),
            Arc::clone(&progress),
        ));
        Arc::new(Self {
            start_time: Instant::now(),
            progress,
            runner,
            output,
            poll_interval,
            shutdown: CancellationToken::new(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
