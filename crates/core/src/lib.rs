// crates/core/src/lib.rs
pub mod archive;
pub mod error;
pub mod media;
pub mod output_dir;
pub mod progress_log;
pub mod runner;
pub mod types;

pub use error::*;
pub use media::{MediaSource, YtDlpConfig, YtDlpSource};
pub use output_dir::{CleanupReport, OutputDir};
pub use progress_log::ProgressLog;
pub use runner::{slice_range, BatchJobRunner, BATCH_COMPLETE_MESSAGE};
pub use types::*;
