//! tagwindow: redirects maintenance windows to dated image tags.
//!
//! This is the application entry point. It loads configuration, initializes
//! tracing, applies environment overrides, builds the Axum router and runs the
//! HTTP server until shutdown.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tagwindow::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use tagwindow::http::start_server;
use tagwindow::{create_router, AppState};

/// tagwindow: redirects maintenance windows to dated image tags
#[derive(Parser, Debug)]
#[command(name = "tagwindow", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "tagwindow=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Environment overrides are applied after tracing is up so rejected values get logged
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "tagwindow starting"
    );

    config.apply_env(|key| std::env::var(key).ok());

    tracing::info!(
        config = ?args.config,
        image_day = %config.schedule.image_day,
        "Loaded configuration"
    );

    let state = AppState::new(config.clone());
    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
