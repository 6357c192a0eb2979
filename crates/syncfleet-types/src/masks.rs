//! Port-mask derivation
//!
//! The synchronization daemon takes its port assignments as bitmasks, one
//! bit per physical port. Deriving them from the interface list is pure
//! arithmetic and must stay deterministic: the reconciler re-renders
//! manifests every pass and compares the result against the cluster.

use serde::{Deserialize, Serialize};

use crate::config::{InterfaceSpec, PortRole};

/// Port bitmasks consumed by the manifest template.
///
/// `master` is a combined role mask: Master and Slave ports both
/// contribute to it, and `slave` stays zero. The template reads only the
/// combined field; the daemon derives port direction from its profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMasks {
    /// Ports carrying SyncE.
    pub synce: u64,

    /// Combined role mask, one bit per port with an assigned role.
    pub master: u64,

    /// Reserved, always zero.
    pub slave: u64,
}

impl PortMasks {
    /// Derive the masks from an interface list.
    ///
    /// Duplicate ports OR idempotently; shift amounts wrap silently for
    /// out-of-range port indices, which the schema bounds elsewhere.
    pub fn from_interfaces(interfaces: &[InterfaceSpec]) -> Self {
        let mut masks = Self::default();
        for interface in interfaces {
            let bit = 1u64.wrapping_shl(interface.eth_port);
            if interface.sync_e {
                masks.synce |= bit;
            }
            match interface.role {
                PortRole::Master | PortRole::Slave => masks.master |= bit,
                PortRole::Unset => {}
            }
        }
        masks
    }
}
