//! Periodic resync loop
//!
//! Drives the reconciliation engine on a fixed interval. The first tick
//! fires immediately, so the daemon converges once at startup before
//! settling into the steady cadence. A channel lets other tasks queue an
//! out-of-band pass without waiting for the next tick.

use std::sync::Arc;
use syncfleet_controller::{ClusterApi, Reconciler};
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, Duration};

/// Scheduler state
pub struct ResyncScheduler<C: ClusterApi + 'static> {
    interval: Duration,
    reconciler: Arc<Reconciler<C>>,
    resync_tx: mpsc::Sender<()>,
    running: Arc<RwLock<bool>>,
}

impl<C: ClusterApi + 'static> ResyncScheduler<C> {
    /// Create a new scheduler
    pub fn new(
        interval: Duration,
        reconciler: Arc<Reconciler<C>>,
    ) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (resync_tx, resync_rx) = mpsc::channel(10);

        let scheduler = Arc::new(Self {
            interval,
            reconciler,
            resync_tx,
            running: Arc::new(RwLock::new(false)),
        });

        (scheduler, resync_rx)
    }

    /// Queue an immediate resync pass
    pub async fn trigger_resync(&self) {
        let _ = self.resync_tx.send(()).await;
    }

    /// Start the resync loop
    pub async fn start(self: Arc<Self>, mut resync_rx: mpsc::Receiver<()>) {
        {
            let mut running = self.running.write().await;
            *running = true;
        }

        tracing::info!("Resync scheduler started");

        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(scheduler.interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = scheduler.reconciler.reconcile().await {
                            tracing::error!(error = %e, "Resync pass failed");
                        }
                    }
                    Some(_) = resync_rx.recv() => {
                        if let Err(e) = scheduler.reconciler.reconcile().await {
                            tracing::error!(error = %e, "Triggered resync failed");
                        }
                    }
                    else => break,
                }

                let running = scheduler.running.read().await;
                if !*running {
                    break;
                }
            }
        });

        let _ = handle.await;

        tracing::info!("Resync scheduler stopped");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }
}
