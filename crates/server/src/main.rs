// crates/server/src/main.rs
//! playlist-zip server binary.
//!
//! Parses configuration, prepares the output directory and serves the API
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use playlist_zip_core::{OutputDir, YtDlpSource};
use playlist_zip_server::{create_app, AppState, ServerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,playlist_zip_server=info,playlist_zip_core=info".into()),
        )
        .init();

    let config = ServerConfig::parse();

    let output = OutputDir::new(&config.output_dir);
    output.ensure_exists().await.with_context(|| {
        format!(
            "Could not create output directory {}",
            config.output_dir.display()
        )
    })?;

    let media = Arc::new(YtDlpSource::new(config.ytdlp_config()));
    let state = AppState::with_poll_interval(media, output, config.poll_interval());
    let shutdown = state.shutdown.clone();
    let app = create_app(state, &config.allowed_origin);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;

    tracing::info!(
        %addr,
        output_dir = %config.output_dir.display(),
        yt_dlp = %config.ytdlp,
        allowed_origin = %config.allowed_origin,
        "playlist-zip listening"
    );
    eprintln!("\n  playlist-zip v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("  \u{2192} http://{addr}\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}
