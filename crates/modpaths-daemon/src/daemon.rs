//! Daemon lifecycle management.

use anyhow::{Context, Result};
use modpaths_core::ServerConfig;
use modpaths_http::HttpServer;
use modpaths_indexer::{ExclusionSet, GoResolver, IndexStore, ModuleResolver, RefreshScheduler};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::handler::DaemonHandler;
use crate::signals;

/// The main daemon process
pub struct Daemon {
    config: ServerConfig,
    store: Arc<IndexStore>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Daemon {
    /// Create a daemon from configuration.
    ///
    /// Fails when the exclusions file cannot be read.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.refresh_interval_secs == 0 {
            anyhow::bail!("Refresh interval must be at least one second");
        }

        let exclusions = match &config.exclusions_file {
            Some(path) => {
                let file = File::open(path).with_context(|| {
                    format!("Failed to open exclusions file {}", path.display())
                })?;
                ExclusionSet::load(BufReader::new(file)).with_context(|| {
                    format!("Failed to read exclusions file {}", path.display())
                })?
            }
            None => ExclusionSet::default(),
        };

        let roots = if config.roots.is_empty() {
            GoResolver::default_src_dirs()
        } else {
            config.roots.clone()
        };

        let resolver: Arc<dyn ModuleResolver> = Arc::new(GoResolver::for_roots(&roots));
        let store = Arc::new(IndexStore::with_config(roots, exclusions, resolver));

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            store,
            shutdown_tx,
        })
    }

    pub fn store(&self) -> Arc<IndexStore> {
        self.store.clone()
    }

    /// Sender that stops [`Daemon::run`] when sent to
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Index, then serve until a shutdown signal arrives
    pub async fn run(&self) -> Result<()> {
        let exclusions: Vec<String> = self
            .store
            .exclusions()
            .iter()
            .map(str::to_string)
            .collect();

        tracing::info!(
            listen = %self.config.listen_addr,
            roots = ?self.store.roots(),
            exclusions = ?exclusions,
            "Daemon starting"
        );

        // Serve only once the first generation exists
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.rebuild())
            .await
            .context("Initial index failed")?;

        let refresh =
            RefreshScheduler::new(self.store.clone(), self.config.refresh_interval())?.spawn();

        let handler = Arc::new(DaemonHandler::new(self.store.clone()));
        let server = HttpServer::bind(&self.config.listen_addr, handler)
            .await
            .context("Failed to start HTTP server")?;

        // Set up shutdown signal
        let shutdown_rx = self.shutdown_tx.subscribe();

        let result = server
            .run_until(async move {
                let reason = signals::wait_for_shutdown(shutdown_rx).await;
                tracing::info!(%reason, "Shutting down");
            })
            .await;

        // Cleanup
        refresh.join().await;
        tracing::info!("Daemon stopped");

        result.context("HTTP server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_new_uses_default_exclusions() {
        let temp_dir = tempdir().unwrap();
        let config = ServerConfig {
            roots: vec![temp_dir.path().to_path_buf()],
            ..ServerConfig::default()
        };

        let daemon = Daemon::new(config).unwrap();
        assert_eq!(*daemon.store().exclusions(), ExclusionSet::default());
        assert_eq!(daemon.store().roots(), vec![temp_dir.path().to_path_buf()]);
    }

    #[test]
    fn test_new_loads_exclusions_file() {
        let temp_dir = tempdir().unwrap();
        let exclude = temp_dir.path().join("exclude");
        std::fs::write(&exclude, "vendor\ntestdata\n").unwrap();

        let config = ServerConfig {
            exclusions_file: Some(exclude),
            roots: vec![temp_dir.path().to_path_buf()],
            ..ServerConfig::default()
        };

        let daemon = Daemon::new(config).unwrap();
        let names: Vec<_> = daemon
            .store()
            .exclusions()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(names, vec!["testdata", "vendor"]);
    }

    #[test]
    fn test_unreadable_exclusions_file_is_fatal() {
        let config = ServerConfig {
            exclusions_file: Some(PathBuf::from("/nonexistent/modpaths/exclude")),
            ..ServerConfig::default()
        };

        let err = Daemon::new(config).err().unwrap();
        assert!(err.to_string().contains("exclusions file"));
    }

    #[test]
    fn test_zero_refresh_interval_is_rejected() {
        let config = ServerConfig {
            refresh_interval_secs: 0,
            ..ServerConfig::default()
        };

        assert!(Daemon::new(config).is_err());
    }
}
