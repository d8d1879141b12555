//! Graceful shutdown on SIGTERM and SIGINT.

use std::time::Duration;

use axum_server::Handle;

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// On either signal the server stops accepting connections and gives
/// in-flight requests up to `grace` to complete.
pub fn setup_shutdown_handler(handle: Handle, grace: Duration) {
    tokio::spawn(async move {
        let Some(signal) = wait_for_signal().await else {
            return;
        };

        tracing::info!(
            signal,
            grace_secs = grace.as_secs(),
            "Initiating graceful shutdown"
        );
        handle.graceful_shutdown(Some(grace));
    });
}

/// Resolves with the name of the first termination signal received.
///
/// Returns `None` when no signal handler could be installed; the server then
/// only stops when its listener does.
async fn wait_for_signal() -> Option<&'static str> {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Some("SIGINT"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => sigterm.recv().await.map(|()| "SIGTERM"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<&'static str>>();

    tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    }
}
