//! Configuration for the modpaths daemon.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// File with whitespace-separated directory names to skip.
    /// Falls back to the built-in VCS exclusions when unset.
    #[serde(default)]
    pub exclusions_file: Option<PathBuf>,

    /// Root directories to index.
    /// Falls back to the platform's Go source directories when empty.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Seconds between full re-indexes (default: 45 minutes)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> String {
    "localhost:6118".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    45 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            exclusions_file: None,
            roots: Vec::new(),
            refresh_interval_secs: default_refresh_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Location of the per-user config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("modpaths").join("config.yaml"))
    }

    /// Load the per-user config file, or defaults when it does not exist.
    ///
    /// A config file that exists but cannot be read or parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
