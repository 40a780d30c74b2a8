use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use voice_metrics_service::config::ServiceConfig;
use voice_metrics_service::server::{router, AppState};
use voice_metrics_service::transcription::WhisperRecognizer;

/// HTTP service extracting acoustic-phonetic biomarkers from a spoken pangram
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Whisper model file (.bin)
    #[arg(short, long)]
    model: PathBuf,

    /// Listen port
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Language code (e.g., "en", "auto")
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Number of threads for Whisper inference
    #[arg(long, default_value = "4")]
    threads: i32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            port: self.port,
            model_path: self.model,
            language: self.language,
            n_threads: self.threads,
            ..ServiceConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = args.into_config();

    // Load the recognizer before serving so readiness is explicit:
    // /health answers only once the model is usable.
    let recognizer = WhisperRecognizer::new(&config.model_path, &config.language, config.n_threads)
        .context("Failed to initialize recognizer")?;
    let state = AppState {
        recognizer: Arc::new(recognizer),
    };

    let app = router(state, config.max_body_bytes);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("voice metrics service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
