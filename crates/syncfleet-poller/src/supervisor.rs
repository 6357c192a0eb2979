//! Poller lifecycle supervision
//!
//! The reconciler asks for pollers by (node, kind) every pass; the
//! supervisor makes that idempotent. It keeps one task handle per key,
//! respawns tasks that died, and aborts everything it owns on teardown.

use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::event::{PollerEvent, PollerEventDetail, PollerKey, PollerKind};
use crate::gpsd::{GpsdPoller, GpsdPollerConfig};
use crate::tsync::{TsyncPoller, TsyncPollerConfig};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Timings handed to every poller the supervisor spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerTimings {
    /// Delay before a tsync poller's first connection attempt.
    pub initial_delay: Duration,
    /// Pause between failed connection attempts.
    pub connect_retry: Duration,
    /// Upper bound on each tsync query.
    pub query_timeout: Duration,
    /// Pause between polling cycles.
    pub cycle_interval: Duration,
}

impl Default for PollerTimings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(30),
            connect_retry: Duration::from_secs(5),
            query_timeout: Duration::from_secs(30),
            cycle_interval: Duration::from_secs(30),
        }
    }
}

/// Owns the poller tasks for the whole fleet.
pub struct PollerSupervisor {
    timings: PollerTimings,
    event_tx: broadcast::Sender<PollerEvent>,
    handles: DashMap<PollerKey, JoinHandle<()>>,
}

impl PollerSupervisor {
    pub fn new() -> Self {
        Self::with_timings(PollerTimings::default())
    }

    pub fn with_timings(timings: PollerTimings) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            timings,
            event_tx,
            handles: DashMap::new(),
        }
    }

    /// Subscribe to events from every poller this supervisor owns.
    pub fn subscribe(&self) -> broadcast::Receiver<PollerEvent> {
        self.event_tx.subscribe()
    }

    /// Make sure a tsync poller for `node` is running. Returns true if a
    /// task was spawned, false if one was already alive.
    pub fn ensure_tsync(&self, node: &str, endpoint: &str) -> bool {
        let mut config = TsyncPollerConfig::new(endpoint);
        config.initial_delay = self.timings.initial_delay;
        config.connect_retry = self.timings.connect_retry;
        config.query_timeout = self.timings.query_timeout;
        config.cycle_interval = self.timings.cycle_interval;

        let poller = TsyncPoller::new(node, config, self.event_tx.clone());
        self.ensure(PollerKey::new(node, PollerKind::Tsync), move || {
            tokio::spawn(poller.run())
        })
    }

    /// Make sure a gpsd poller for `node` is running. Returns true if a
    /// task was spawned, false if one was already alive.
    pub fn ensure_gpsd(&self, node: &str, endpoint: &str) -> bool {
        let mut config = GpsdPollerConfig::new(endpoint);
        config.connect_retry = self.timings.connect_retry;
        config.cycle_interval = self.timings.cycle_interval;

        let poller = GpsdPoller::new(node, config, self.event_tx.clone());
        self.ensure(PollerKey::new(node, PollerKind::Gpsd), move || {
            tokio::spawn(poller.run())
        })
    }

    fn ensure<F>(&self, key: PollerKey, spawn: F) -> bool
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        match self.handles.entry(key) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_finished() {
                    debug!(poller = %entry.key(), "restarting finished poller");
                    entry.insert(spawn());
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                info!(poller = %entry.key(), "starting poller");
                entry.insert(spawn());
                true
            }
        }
    }

    /// Whether a live task exists for `key`.
    pub fn is_running(&self, key: &PollerKey) -> bool {
        self.handles
            .get(key)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Keys of all live tasks.
    pub fn running(&self) -> Vec<PollerKey> {
        self.handles
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Abort one poller. Returns false if no task was registered.
    pub fn stop(&self, key: &PollerKey) -> bool {
        match self.handles.remove(key) {
            Some((key, handle)) => {
                handle.abort();
                info!(poller = %key, "stopped poller");
                let _ = self.event_tx.send(PollerEvent::new(
                    &key.node,
                    key.kind,
                    PollerEventDetail::Stopped,
                ));
                true
            }
            None => false,
        }
    }

    /// Abort every poller and clear the registry.
    pub fn stop_all(&self) {
        for entry in self.handles.iter() {
            entry.value().abort();
        }
        self.handles.clear();
        info!("stopped all pollers");
    }
}

impl Default for PollerSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PollerSupervisor {
    fn drop(&mut self) {
        for entry in self.handles.iter() {
            entry.value().abort();
        }
    }
}
