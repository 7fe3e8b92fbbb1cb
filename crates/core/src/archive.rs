// crates/core/src/archive.rs
//! ZIP bundling of produced audio files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// Archive name for a job finishing at `now`: `playlist_<YYYYmmddHHMMSS>.zip`.
pub fn archive_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("playlist_{}.zip", now.format("%Y%m%d%H%M%S"))
}

/// First name based on `name` that does not exist in `dir`.
///
/// `playlist_X.zip` → `playlist_X_1.zip` → `playlist_X_2.zip` ...
fn unused_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (name, String::new()),
    };
    (1..)
        .map(|n| format!("{stem}_{n}{ext}"))
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or_else(|| name.to_string())
}

/// Write `files` (paths relative to `dir`) into a deflate-compressed ZIP.
///
/// Each file is stored under its bare name. Returns the archive name actually
/// used, relative to `dir`. Blocking; call through `spawn_blocking` from async code.
pub fn write_zip(dir: &Path, name: &str, files: &[String]) -> Result<String, ArchiveError> {
    let name = unused_name(dir, name);
    let archive_path = dir.join(&name);

    let file = File::create(&archive_path).map_err(|e| ArchiveError::io(&archive_path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file_name in files {
        let src = dir.join(file_name);
        let mut input = File::open(&src).map_err(|e| ArchiveError::io(&src, e))?;
        zip.start_file(file_name.as_str(), options)
            .map_err(|e| ArchiveError::zip(&archive_path, e))?;
        std::io::copy(&mut input, &mut zip).map_err(|e| ArchiveError::io(&src, e))?;
    }

    let mut writer = zip
        .finish()
        .map_err(|e| ArchiveError::zip(&archive_path, e))?;
    writer
        .flush()
        .map_err(|e| ArchiveError::io(&archive_path, e))?;

    tracing::info!(archive = %name, files = files.len(), "archive written");
    Ok(name)
}

/// Async wrapper around [`write_zip`].
pub async fn write_zip_async(
    dir: PathBuf,
    name: String,
    files: Vec<String>,
) -> Result<String, ArchiveError> {
    tokio::task::spawn_blocking(move || write_zip(&dir, &name, &files))
        .await
        .map_err(|e| ArchiveError::Join(e.to_string()))?
}
