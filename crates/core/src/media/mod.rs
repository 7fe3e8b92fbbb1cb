// crates/core/src/media/mod.rs
//! Media extraction seam.
//!
//! Provides the `MediaSource` trait the job runner depends on, and the
//! `yt-dlp` backed implementation used in production.

pub mod config;
pub mod filename;
pub mod source;
pub mod ytdlp;

pub use config::YtDlpConfig;
pub use filename::{claim_stem, output_stem};
pub use source::MediaSource;
pub use ytdlp::YtDlpSource;
