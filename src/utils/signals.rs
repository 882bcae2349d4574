//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

/// Wait for a shutdown signal (SIGTERM, SIGINT) and return its number
///
/// If the handler cannot be installed this never resolves, leaving the
/// server running until it is killed.
pub async fn shutdown_signal() -> i32 {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to install signal handler: {}", e);
            return futures::future::pending().await;
        }
    };

    match signals.next().await {
        Some(signal) => {
            info!("Received signal: {}", signal);
            signal
        }
        None => futures::future::pending().await,
    }
}
