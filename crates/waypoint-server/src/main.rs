//! Waypoint server - learns browsing sequences and serves next-tab predictions.

use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use waypoint_server::{config, logging, mining_task, routes, state};

use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// Waypoint server - browsing pattern mining and next-tab prediction.
#[derive(Parser, Debug)]
#[command(name = "waypoint-server")]
#[command(about = "HTTP server that mines browsing history and predicts the next tab")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override database path from config
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Import a JSON-lines visit log before starting
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Enable verbose logging (INFO level, miner detail)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging (DEBUG level)
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (TRACE level, per-prediction detail)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "miner=debug").
    /// Can be specified multiple times. Targets are prefixed with "waypoint::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    tracing::info!(
        target: "waypoint::startup",
        "Loaded configuration (port: {}, db: {})",
        config.port,
        config.db_path.display()
    );

    let state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(target: "waypoint::startup", "Initialized application state");

    if let Some(path) = &cli.import {
        let stats = state.engine.store().import_jsonl(path)?;
        tracing::info!(
            target: "waypoint::startup",
            "Imported {} visits ({} skipped)",
            stats.imported,
            stats.skipped
        );
    }

    mining_task::spawn_mining_loop(state.clone());
    tracing::info!(
        target: "waypoint::startup",
        "Started background mining (every {} ms)",
        config.prediction.update_interval_ms
    );

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "waypoint::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
