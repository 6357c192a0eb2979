//! Per-node render context
//!
//! A [`RenderContext`] captures everything the manifest template may
//! reference for one (desired-state, node) pair. The flattened map from
//! [`RenderContext::values`] is the single source of substitution values;
//! a placeholder outside this set is a render error, never an empty
//! string.

use std::collections::BTreeMap;

use syncfleet_types::{Node, PortMasks, SyncConfig};

/// Default port of the synchronization daemon's gRPC endpoint.
pub const DEFAULT_TSYNC_PORT: u16 = 50051;

/// Default port of the GPS telemetry endpoint.
pub const DEFAULT_GPS_PORT: u16 = 2947;

/// Environment variable overriding [`DEFAULT_TSYNC_PORT`].
pub const TSYNC_PORT_ENV: &str = "SYNCFLEET_TSYNC_PORT";

/// Environment variable overriding [`DEFAULT_GPS_PORT`].
pub const GPS_PORT_ENV: &str = "SYNCFLEET_GPS_PORT";

/// Ports the rendered services expose, shared by every node in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfig {
    /// gRPC port of the synchronization daemon.
    pub tsync_port: u16,
    /// TCP port of the GPS telemetry service.
    pub gps_port: u16,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            tsync_port: DEFAULT_TSYNC_PORT,
            gps_port: DEFAULT_GPS_PORT,
        }
    }
}

impl PortConfig {
    /// Read the port overrides from the environment.
    ///
    /// Unset or unparseable variables fall back to the defaults without
    /// raising an error.
    pub fn from_env() -> Self {
        Self {
            tsync_port: env_port(TSYNC_PORT_ENV, DEFAULT_TSYNC_PORT),
            gps_port: env_port(GPS_PORT_ENV, DEFAULT_GPS_PORT),
        }
    }
}

fn env_port(var: &str, fallback: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(fallback)
}

/// Substitution values for rendering one node's manifest.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Name of the desired-state record being reconciled.
    pub config_name: String,
    /// Namespace the rendered objects land in.
    pub namespace: String,
    /// Target node.
    pub node_name: String,
    /// Prefix for per-node service names, currently the node name.
    pub service_prefix: String,
    /// Wire label of the configured synchronization mode.
    pub mode_label: String,
    /// Whether the mode requires a GPS receiver.
    pub enable_gps: bool,
    /// Daemon profile selected by the mode.
    pub profile_id: u8,
    /// Port bitmasks derived from the interface list.
    pub masks: PortMasks,
    /// Service ports for this pass.
    pub ports: PortConfig,
}

impl RenderContext {
    /// Build the context for one desired-state record on one node.
    pub fn new(config: &SyncConfig, node: &Node, ports: PortConfig) -> Self {
        let mode = &config.spec.mode;
        Self {
            config_name: config.name.clone(),
            namespace: config.namespace.clone(),
            node_name: node.name.clone(),
            service_prefix: node.name.clone(),
            mode_label: mode.label().to_string(),
            enable_gps: mode.gps_enabled(),
            profile_id: mode.profile_id(),
            masks: PortMasks::from_interfaces(&config.spec.interfaces),
            ports,
        }
    }

    /// Flatten the context into the substitution map consumed by
    /// [`substitute`](crate::template::substitute).
    ///
    /// Numeric fields render in decimal and booleans as `true`/`false`,
    /// matching what the template embeds into container environments.
    pub fn values(&self) -> BTreeMap<&'static str, String> {
        let mut values = BTreeMap::new();
        values.insert("config_name", self.config_name.clone());
        values.insert("namespace", self.namespace.clone());
        values.insert("node_name", self.node_name.clone());
        values.insert("service_prefix", self.service_prefix.clone());
        values.insert("mode_label", self.mode_label.clone());
        values.insert("enable_gps", self.enable_gps.to_string());
        values.insert("profile_id", self.profile_id.to_string());
        values.insert("synce_port_mask", self.masks.synce.to_string());
        values.insert("master_port_mask", self.masks.master.to_string());
        values.insert("slave_port_mask", self.masks.slave.to_string());
        values.insert("gps_port", self.ports.gps_port.to_string());
        values.insert("tsync_port", self.ports.tsync_port.to_string());
        values
    }
}
