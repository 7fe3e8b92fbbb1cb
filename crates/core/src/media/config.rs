// crates/core/src/media/config.rs
//! yt-dlp invocation settings.

/// Configuration for a `YtDlpSource` instance.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Binary name or path.
    pub binary: String,
    /// Target codec passed to `--audio-format`; also the output extension.
    pub audio_format: String,
    /// Passed to `--audio-quality`.
    pub audio_quality: String,
    /// Prefix joined with an entry id to form the item URL.
    pub item_url_base: String,
    pub extract_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".into(),
            audio_format: "mp3".into(),
            audio_quality: "192K".into(),
            item_url_base: "https://www.youtube.com/watch?v=".into(),
            extract_timeout_secs: 120,
            download_timeout_secs: 900,
        }
    }
}

impl YtDlpConfig {
    pub fn item_url(&self, item_id: &str) -> String {
        format!("{}{}", self.item_url_base, item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_item_url() {
        let config = YtDlpConfig::default();
        assert_eq!(
            config.item_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(config.audio_format, "mp3");
    }
}
