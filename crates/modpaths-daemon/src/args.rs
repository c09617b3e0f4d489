//! Command-line flags for the daemon.

use clap::Parser;
use modpaths_core::{ConfigError, ServerConfig};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "modpaths-daemon")]
#[command(about = "Index Go source directories and answer path queries over HTTP")]
#[command(version)]
pub struct Args {
    /// HTTP service address, e.g. 'localhost:6118'
    #[arg(long = "http", value_name = "[HOST]:PORT")]
    pub http: Option<String>,

    /// File listing directory names to exclude from indexing
    #[arg(long = "exclude", value_name = "FILE")]
    pub exclude: Option<PathBuf>,

    /// Root directories containing Go packages, separated like $PATH
    #[arg(long = "root", value_name = "DIRS")]
    pub root: Option<OsString>,

    /// Seconds between full re-indexes
    #[arg(long = "refresh-interval", value_name = "SECS")]
    pub refresh_interval: Option<u64>,

    /// YAML config file (default: <config dir>/modpaths/config.yaml)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Load the config file and apply flag overrides on top.
    pub fn load_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load_from(path)?,
            None => ServerConfig::load()?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ServerConfig) {
        if let Some(http) = &self.http {
            config.listen_addr = http.clone();
        }
        if let Some(exclude) = &self.exclude {
            config.exclusions_file = Some(exclude.clone());
        }
        if let Some(root) = &self.root {
            config.roots = std::env::split_paths(root)
                .filter(|path| !path.as_os_str().is_empty())
                .collect();
        }
        if let Some(secs) = self.refresh_interval {
            config.refresh_interval_secs = secs;
        }
    }
}
