//! Periodic index refresh.

use crate::{IndexStore, IndexerError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Interval between scheduled rebuilds (45 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(45 * 60);

/// Rebuilds an [`IndexStore`] on a fixed interval.
pub struct RefreshScheduler {
    store: Arc<IndexStore>,
    interval: Duration,
}

impl RefreshScheduler {
    /// Fails with [`IndexerError::ZeroInterval`] when `interval` is zero.
    pub fn new(store: Arc<IndexStore>, interval: Duration) -> Result<Self, IndexerError> {
        if interval.is_zero() {
            return Err(IndexerError::ZeroInterval);
        }
        Ok(Self { store, interval })
    }

    /// Start the refresh loop on the current tokio runtime.
    ///
    /// The first scheduled rebuild happens one interval from now.
    pub fn spawn(self) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let trigger = Arc::new(Notify::new());
        let task = tokio::spawn(self.run(shutdown_rx, trigger.clone()));

        RefreshHandle {
            shutdown_tx,
            trigger,
            task,
        }
    }

    async fn run(self, mut shutdown_rx: broadcast::Receiver<()>, trigger: Arc<Notify>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs(),
            "Refresh scheduler started"
        );

        loop {
            // Shutdown is checked before any pending tick or trigger
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Scheduled rebuild");
                }
                _ = trigger.notified() => {
                    debug!("Rebuild requested");
                }
            }

            // Awaited in place, so the next tick cannot start a second rebuild
            self.refresh().await;
        }

        info!("Refresh scheduler stopped");
    }

    async fn refresh(&self) {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.try_rebuild()).await {
            Ok(Some(stats)) => {
                debug!(generation = stats.generation, "Scheduled rebuild complete");
            }
            Ok(None) => {
                info!("Rebuild already in progress, skipping");
            }
            Err(e) => {
                error!(error = %e, "Rebuild task failed");
            }
        }
    }
}

/// Controls a running [`RefreshScheduler`]. Dropping it stops the loop.
pub struct RefreshHandle {
    shutdown_tx: broadcast::Sender<()>,
    trigger: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Ask for a rebuild now instead of waiting for the next tick.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Stop the loop. A rebuild in progress finishes first.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and wait for it to exit.
    pub async fn join(self) {
        self.stop();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Refresh scheduler panicked");
        }
    }
}
