//! Indexer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during indexing operations.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured root could not be read at all
    #[error("Cannot read root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured root exists but is not a directory
    #[error("Root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A refresh interval of zero
    #[error("Refresh interval must be greater than zero")]
    ZeroInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexerError::NotADirectory(PathBuf::from("/test/path"));
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_root_unreadable_display() {
        let err = IndexerError::RootUnreadable {
            path: PathBuf::from("/missing/root"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/root"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_zero_interval_display() {
        assert!(IndexerError::ZeroInterval.to_string().contains("interval"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IndexerError = io_err.into();
        assert!(matches!(err, IndexerError::Io(_)));
    }
}
