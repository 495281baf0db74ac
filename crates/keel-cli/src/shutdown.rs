//! Shutdown signal handling

use tokio::signal;
use tracing::{info, warn};

/// Resolve on SIGINT or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let sigint = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install SIGINT handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = sigint => info!("Received SIGINT signal (Ctrl+C)"),
        _ = sigterm => info!("Received SIGTERM signal"),
    }
}
