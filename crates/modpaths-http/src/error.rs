//! HTTP error types

use thiserror::Error;

/// Errors that can occur while serving or sending requests
#[derive(Debug, Error)]
pub enum HttpError {
    /// IO error on the listening socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request could not be sent or its response read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Daemon answered with an error status
    #[error("Daemon returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Nothing is listening at the daemon address
    #[error("Daemon not running (no listener at {0})")]
    DaemonNotRunning(String),
}
