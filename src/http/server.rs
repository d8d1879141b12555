//! HTTP server startup logic.

use axum::Router;
use axum_server::Handle;

use crate::config::{AppConfig, ConfigError};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid server configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Start the HTTP server described by `config`.
///
/// Blocks until the server has shut down, either gracefully after a signal or
/// because the listener failed.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = config.http.socket_addr()?;
    let handle = Handle::new();

    tracing::info!(
        %addr,
        request_timeout_secs = config.http.request_timeout_seconds,
        "Starting HTTP server"
    );

    shutdown::setup_shutdown_handler(handle.clone(), config.http.shutdown_grace());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
