//! Desired-state model
//!
//! `SyncConfig` is the declarative record the control loop works from. One
//! config may select many nodes; the controller renders and applies the
//! manifest template once per matched node and publishes one status entry
//! per node back onto the config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::mode::SyncMode;

/// Declarative synchronization config for a set of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Object name, unique within the namespace.
    pub name: String,

    /// Namespace the config and its rendered children live in.
    pub namespace: String,

    /// Desired state. Read-only to the control loop.
    pub spec: SyncConfigSpec,

    /// Observed state, replaced wholesale every reconciliation pass.
    #[serde(default)]
    pub status: SyncConfigStatus,
}

impl SyncConfig {
    /// `namespace/name` key used for lookups and logging.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Desired state carried by a [`SyncConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfigSpec {
    /// Label selector deciding which nodes the config applies to. Empty
    /// selects every node.
    #[serde(default)]
    pub node_selector: BTreeMap<String, String>,

    /// Synchronization role the selected nodes should run.
    pub mode: SyncMode,

    /// Physical ports participating in synchronization.
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
}

/// A single physical port in the interface list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSpec {
    /// Port index on the timing NIC.
    pub eth_port: u32,

    /// Timing role of the port.
    #[serde(default)]
    pub role: PortRole,

    /// Whether SyncE is carried on the port.
    #[serde(default)]
    pub sync_e: bool,
}

/// Timing role assigned to a port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRole {
    Master,
    Slave,
    #[default]
    Unset,
}

/// Observed state of a [`SyncConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfigStatus {
    /// One entry per node matched in the latest pass.
    #[serde(default)]
    pub nodes: Vec<NodeSyncStatus>,
}

/// Per-node status entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSyncStatus {
    /// Node the entry describes.
    pub name: String,

    /// Latest report from the node's tsync daemon.
    #[serde(default)]
    pub tsync: TsyncReport,

    /// Latest GPS fix from the node's gpsd daemon.
    #[serde(default)]
    pub gps: GpsReport,
}

impl NodeSyncStatus {
    /// Entry for a node nothing has been heard from yet.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tsync: TsyncReport::default(),
            gps: GpsReport::default(),
        }
    }
}

/// Status and mode strings reported by the tsync daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsyncReport {
    pub status: String,
    pub mode: String,
}

impl Default for TsyncReport {
    fn default() -> Self {
        Self {
            status: "unknown".to_string(),
            mode: "unknown".to_string(),
        }
    }
}

/// Most recent GPS fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsReport {
    pub time: String,
    pub lat: f32,
    pub lon: f32,
}

impl Default for GpsReport {
    fn default() -> Self {
        Self {
            time: "unknown".to_string(),
            lat: 0.0,
            lon: 0.0,
        }
    }
}

/// A schedulable fleet node as the cluster reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Selector-subset match: every selector pair must be present in the
    /// node's labels. The empty selector matches every node.
    pub fn matches_selector(&self, selector: &BTreeMap<String, String>) -> bool {
        selector
            .iter()
            .all(|(key, value)| self.labels.get(key) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> SyncConfig {
        SyncConfig {
            name: "gm-profile".to_string(),
            namespace: "timing".to_string(),
            spec: SyncConfigSpec {
                node_selector: BTreeMap::from([(
                    "feature.timing/nic".to_string(),
                    "present".to_string(),
                )]),
                mode: SyncMode::Grandmaster,
                interfaces: vec![InterfaceSpec {
                    eth_port: 2,
                    role: PortRole::Master,
                    sync_e: true,
                }],
            },
            status: SyncConfigStatus::default(),
        }
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(sample_config().qualified_name(), "timing/gm-profile");
    }

    #[test]
    fn test_selector_subset_matching() {
        let node = Node::new("node-1")
            .with_label("feature.timing/nic", "present")
            .with_label("zone", "edge-a");

        let config = sample_config();
        assert!(node.matches_selector(&config.spec.node_selector));

        let mut stricter = config.spec.node_selector.clone();
        stricter.insert("zone".to_string(), "edge-b".to_string());
        assert!(!node.matches_selector(&stricter));

        assert!(node.matches_selector(&BTreeMap::new()));
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let yaml = r#"
name: gm-profile
namespace: timing
spec:
  nodeSelector:
    feature.timing/nic: present
  mode: T-GM.8275.1
  interfaces:
    - ethPort: 2
      role: Master
      syncE: true
    - ethPort: 3
"#;
        let config: SyncConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config, {
            let mut expected = sample_config();
            expected.spec.interfaces.push(InterfaceSpec {
                eth_port: 3,
                role: PortRole::Unset,
                sync_e: false,
            });
            expected
        });
    }

    #[test]
    fn test_unknown_status_defaults() {
        let status = NodeSyncStatus::unknown("node-1");
        assert_eq!(status.tsync.status, "unknown");
        assert_eq!(status.tsync.mode, "unknown");
        assert_eq!(status.gps.time, "unknown");
        assert_eq!(status.gps.lat, 0.0);
        assert_eq!(status.gps.lon, 0.0);
    }
}
