// crates/server/src/config.rs
//! Server configuration from command-line flags and environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use playlist_zip_core::YtDlpConfig;

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 8000;

/// Download a slice of a playlist as MP3s and bundle them into a ZIP.
#[derive(Debug, Clone, Parser)]
#[command(name = "playlist-zip", version, about)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "PLAYLIST_ZIP_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PLAYLIST_ZIP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory for downloaded audio and archives. Wiped at the start of every job.
    #[arg(long, env = "PLAYLIST_ZIP_OUTPUT_DIR", default_value = "downloads")]
    pub output_dir: PathBuf,

    /// yt-dlp binary name or path.
    #[arg(long = "yt-dlp", env = "PLAYLIST_ZIP_YTDLP", default_value = "yt-dlp")]
    pub ytdlp: String,

    #[arg(long, env = "PLAYLIST_ZIP_AUDIO_FORMAT", default_value = "mp3")]
    pub audio_format: String,

    #[arg(long, env = "PLAYLIST_ZIP_AUDIO_QUALITY", default_value = "192K")]
    pub audio_quality: String,

    /// Origin allowed by CORS; `*` allows any.
    #[arg(
        long,
        env = "PLAYLIST_ZIP_ALLOWED_ORIGIN",
        default_value = "http://localhost:3000"
    )]
    pub allowed_origin: String,

    /// Interval between progress-log checks for each SSE client.
    #[arg(long, env = "PLAYLIST_ZIP_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn ytdlp_config(&self) -> YtDlpConfig {
        YtDlpConfig {
            binary: self.ytdlp.clone(),
            audio_format: self.audio_format.clone(),
            audio_quality: self.audio_quality.clone(),
            ..YtDlpConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["playlist-zip"]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.ytdlp_config().audio_format, "mp3");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "playlist-zip",
            "--port",
            "9001",
            "--output-dir",
            "/tmp/out",
            "--yt-dlp",
            "/opt/yt-dlp",
            "--poll-interval-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.ytdlp_config().binary, "/opt/yt-dlp");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_poll_interval_never_spins() {
        let config =
            ServerConfig::try_parse_from(["playlist-zip", "--poll-interval-ms", "0"]).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
