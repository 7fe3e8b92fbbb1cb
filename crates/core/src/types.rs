// crates/core/src/types.rs
//! Wire and domain types shared by the runner and the HTTP layer.

use serde::{Deserialize, Serialize};

/// A request to download a slice of a playlist as audio.
///
/// `range_start..range_end` is half-open and clamped to the playlist length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Playlist locator handed to the media source unchanged.
    #[serde(alias = "url")]
    pub source: String,
    #[serde(alias = "start")]
    pub range_start: usize,
    #[serde(alias = "end")]
    pub range_end: usize,
}

impl JobRequest {
    pub fn new(source: impl Into<String>, range_start: usize, range_end: usize) -> Self {
        Self {
            source: source.into(),
            range_start,
            range_end,
        }
    }
}

/// One item of a resolved playlist, as reported by flat extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
        }
    }

    /// Human-readable name for progress messages: title, else id, else position.
    pub fn label(&self, position: usize) -> String {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.id.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("entry {position}"))
    }
}

/// Outcome marker of a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Ok,
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub status: JobStatus,
    /// Output filenames in slice order, successful entries only.
    pub produced_files: Vec<String>,
    /// Archive name relative to the output directory.
    pub archive_name: String,
}

/// Entries returned by a progress read plus the cursor for the next read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBatch {
    pub entries: Vec<String>,
    pub cursor: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_request_accepts_camel_case() {
        let req: JobRequest = serde_json::from_str(
            r#"{"source":"https://example.com/playlist?list=PL1","rangeStart":1,"rangeEnd":3}"#,
        )
        .unwrap();
        assert_eq!(req, JobRequest::new("https://example.com/playlist?list=PL1", 1, 3));
    }

    #[test]
    fn test_job_request_accepts_short_aliases() {
        let req: JobRequest =
            serde_json::from_str(r#"{"url":"PL1","start":0,"end":10}"#).unwrap();
        assert_eq!(req.source, "PL1");
        assert_eq!(req.range_start, 0);
        assert_eq!(req.range_end, 10);
    }

    #[test]
    fn test_job_request_rejects_negative_bounds() {
        let res: Result<JobRequest, _> =
            serde_json::from_str(r#"{"source":"PL1","rangeStart":-1,"rangeEnd":3}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_playlist_entry_ignores_unknown_fields() {
        let entry: PlaylistEntry = serde_json::from_str(
            r#"{"_type":"url","id":"abc","title":"Song","duration":215.0}"#,
        )
        .unwrap();
        assert_eq!(entry, PlaylistEntry::new("abc", "Song"));
    }

    #[test]
    fn test_playlist_entry_label_fallbacks() {
        assert_eq!(PlaylistEntry::new("abc", "Song").label(1), "Song");

        let no_title = PlaylistEntry {
            id: Some("abc".into()),
            title: None,
        };
        assert_eq!(no_title.label(2), "abc");

        assert_eq!(PlaylistEntry::default().label(3), "entry 3");
    }

    #[test]
    fn test_job_result_serialize() {
        let result = JobResult {
            status: JobStatus::Ok,
            produced_files: vec!["a.mp3".into()],
            archive_name: "playlist_20260101120000.zip".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"producedFiles\":[\"a.mp3\"]"));
        assert!(json.contains("\"archiveName\":\"playlist_20260101120000.zip\""));
    }
}
