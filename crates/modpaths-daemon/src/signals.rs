//! Shutdown triggers for the daemon.

use std::fmt;
use tokio::sync::broadcast;

/// What stopped the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    /// Sent on the daemon's shutdown channel
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownReason::Interrupt => "SIGINT",
            ShutdownReason::Terminate => "SIGTERM",
            ShutdownReason::Requested => "shutdown request",
        };
        f.write_str(name)
    }
}

/// Resolve once Ctrl+C, SIGTERM or a message on `shutdown_rx` arrives.
pub async fn wait_for_shutdown(mut shutdown_rx: broadcast::Receiver<()>) -> ShutdownReason {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => ShutdownReason::Interrupt,
        _ = sigterm() => ShutdownReason::Terminate,
        _ = shutdown_rx.recv() => ShutdownReason::Requested,
    }
}

#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut stream = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable");
            return std::future::pending().await;
        }
    };
    stream.recv().await;
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
