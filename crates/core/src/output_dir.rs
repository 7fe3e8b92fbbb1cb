// crates/core/src/output_dir.rs
//! The flat, disposable directory holding per-entry audio files and archives.

use std::path::{Component, Path, PathBuf};

use crate::error::{CleanupError, OutputDirError};

/// Outcome of a pre-clean pass. Failures are reported, never returned as errors.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: usize,
    pub failures: Vec<CleanupError>,
}

/// Handle to the output directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Remove every regular file directly inside the directory.
    ///
    /// Subdirectories are left alone. A missing directory is created. Each
    /// failed deletion is logged and collected; the pass always completes.
    pub async fn clear(&self) -> CleanupReport {
        let mut report = CleanupReport::default();

        if let Err(e) = self.ensure_exists().await {
            tracing::warn!(path = %self.root.display(), error = %e, "could not create output directory");
            report.failures.push(CleanupError {
                path: self.root.clone(),
                source: e,
            });
            return report;
        }

        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(path = %self.root.display(), error = %e, "could not list output directory");
                report.failures.push(CleanupError {
                    path: self.root.clone(),
                    source: e,
                });
                return report;
            }
        };

        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(path = %self.root.display(), error = %e, "error while listing output directory");
                    report.failures.push(CleanupError {
                        path: self.root.clone(),
                        source: e,
                    });
                    break;
                }
            };
            let path = entry.path();
            match entry.file_type().await {
                Ok(ft) if ft.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not stat stale file");
                    report.failures.push(CleanupError { path, source: e });
                    continue;
                }
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete stale file");
                    report.failures.push(CleanupError { path, source: e });
                }
            }
        }

        tracing::debug!(
            removed = report.removed,
            failures = report.failures.len(),
            "output directory cleared"
        );
        report
    }

    /// Resolve a client-supplied file name to an existing regular file.
    ///
    /// Only a single normal path component is accepted.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, OutputDirError> {
        let mut components = Path::new(name).components();
        let valid = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !name.contains(['/', '\\']);
        if !valid {
            return Err(OutputDirError::InvalidName {
                name: name.to_string(),
            });
        }

        let path = self.root.join(name);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| OutputDirError::io(name, &path, e))?;
        if !meta.is_file() {
            return Err(OutputDirError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(path)
    }

    /// Whether `name` exists as a regular file directly in the directory.
    pub async fn contains_file(&self, name: &str) -> bool {
        tokio::fs::metadata(self.root.join(name))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
