//! attrition-server - HR attrition analytics HTTP service
//!
//! Loads the trained preprocessor and classifier once, then serves upload,
//! exploration and prediction endpoints until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use attrition_common::config::TomlConfig;
use attrition_server::model::ModelArtifacts;
use attrition_server::{build_router, AppState, HttpSettings};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for attrition-server
#[derive(Parser, Debug)]
#[command(name = "attrition-server")]
#[command(about = "HR attrition analytics service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ATTRITION_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "ATTRITION_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ATTRITION_PORT")]
    port: Option<u16>,

    /// Directory holding the model artifacts (its parent is also searched)
    #[arg(long, env = "ATTRITION_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(args.host, args.port, args.artifact_dir);

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting attrition-server v{}", env!("CARGO_PKG_VERSION"));

    let model_path = config.model_path().context("Model artifact not found")?;
    let preprocessor_path = config
        .preprocessor_path()
        .context("Preprocessor artifact not found")?;
    info!("Model artifact: {}", model_path.display());
    info!("Preprocessor artifact: {}", preprocessor_path.display());

    let artifacts = ModelArtifacts::load(&model_path, &preprocessor_path)
        .context("Failed to load model artifacts")?;
    info!("✓ Model and preprocessor loaded");

    let state = AppState::new(Some(Arc::new(artifacts)), HttpSettings::from(&config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    info!("attrition-server listening on http://{}:{}", config.host, config.port);
    info!("Health check: http://{}:{}/health", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
