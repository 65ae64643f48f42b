use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::services::retry::with_timeout;
use crate::store::Store;

/// Tracks whether the backing store is reachable. Top-up submission is refused
/// while offline.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
    ping_timeout: Duration,
}

impl ConnectivityMonitor {
    pub fn new(ping_timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(true);
        Self {
            tx: Arc::new(tx),
            ping_timeout,
        }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receives every status change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn report(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            if online {
                tracing::info!("Store connection restored");
            } else {
                tracing::warn!("Store connection lost");
            }
        }
    }

    /// Pings the store once and publishes the result.
    pub async fn check(&self, store: &dyn Store) -> bool {
        let online = match with_timeout(self.ping_timeout, store.ping()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Connectivity check failed");
                false
            }
        };
        self.report(online);
        online
    }

    pub fn spawn(&self, store: Arc<dyn Store>, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                monitor.check(store.as_ref()).await;
            }
        })
    }
}
