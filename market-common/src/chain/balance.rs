use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::reader::MarketplaceReader;
use crate::assets::Address;

/// Shortest polling period; `tokio::time::interval` rejects zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Periodically refreshes an account's native balance.
///
/// The latest balance is published on a `watch` channel; `None` until the
/// first successful read. A failed read keeps the last value.
pub struct BalanceWatcher {
    reader: Arc<dyn MarketplaceReader>,
    owner: Address,
    interval: Duration,
}

impl BalanceWatcher {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(reader: Arc<dyn MarketplaceReader>, owner: Address, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                min_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "Balance poll interval too short, using minimum"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        Self {
            reader,
            owner,
            interval,
        }
    }

    /// Start polling on the current runtime.
    pub fn spawn(
        self,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> (watch::Receiver<Option<Decimal>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(self.run(tx, shutdown_rx));
        (rx, handle)
    }

    /// Poll until shutdown is signalled or every receiver is gone.
    pub async fn run(
        self,
        tx: watch::Sender<Option<Decimal>>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            owner = %self.owner,
            interval_secs = self.interval.as_secs(),
            "Balance watcher started"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(owner = %self.owner, "Shutdown signal received, stopping balance watcher");
                    break;
                }
                _ = tx.closed() => {
                    debug!(owner = %self.owner, "No balance subscribers left");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh(&tx).await;
                }
            }
        }
    }

    async fn refresh(&self, tx: &watch::Sender<Option<Decimal>>) {
        match self.reader.native_balance(&self.owner).await {
            Ok(balance) => {
                let changed = tx.send_if_modified(|current| {
                    if *current == Some(balance) {
                        false
                    } else {
                        *current = Some(balance);
                        true
                    }
                });
                if changed {
                    debug!(owner = %self.owner, balance = %balance, "Balance changed");
                }
            }
            Err(e) => {
                warn!(
                    owner = %self.owner,
                    error = %e,
                    "Balance refresh failed, keeping last value"
                );
            }
        }
    }
}
