//! Mode and status vocabularies
//!
//! Pure mappings between the small codes the synchronization daemons speak
//! and the labels operators read. No I/O lives here.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Synchronization role of a fleet node.
///
/// Serialized as the ITU-T telecom profile label the deployed daemons
/// understand. Labels outside the known vocabulary round-trip through
/// [`SyncMode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Telecom grandmaster (`T-GM.8275.1`). The only mode with GPS input.
    Grandmaster,

    /// Telecom boundary clock (`T-BC-8275.1`).
    BoundaryClock,

    /// Telecom slave clock (`T-TSC.8275.1`).
    SlaveClock,

    /// Unrecognized label, carried through untouched.
    Other(String),
}

impl SyncMode {
    /// Profile label for grandmaster operation.
    pub const GRANDMASTER_LABEL: &'static str = "T-GM.8275.1";

    /// Profile label for boundary-clock operation.
    pub const BOUNDARY_CLOCK_LABEL: &'static str = "T-BC-8275.1";

    /// Profile label for slave-clock operation.
    pub const SLAVE_CLOCK_LABEL: &'static str = "T-TSC.8275.1";

    /// Map a label onto the vocabulary. Total: unknown labels become
    /// [`SyncMode::Other`].
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::GRANDMASTER_LABEL => SyncMode::Grandmaster,
            Self::BOUNDARY_CLOCK_LABEL => SyncMode::BoundaryClock,
            Self::SLAVE_CLOCK_LABEL => SyncMode::SlaveClock,
            other => SyncMode::Other(other.to_string()),
        }
    }

    /// The label written into rendered manifests and status reports.
    pub fn label(&self) -> &str {
        match self {
            SyncMode::Grandmaster => Self::GRANDMASTER_LABEL,
            SyncMode::BoundaryClock => Self::BOUNDARY_CLOCK_LABEL,
            SyncMode::SlaveClock => Self::SLAVE_CLOCK_LABEL,
            SyncMode::Other(label) => label,
        }
    }

    /// Numeric profile id handed to the synchronization daemon.
    ///
    /// Unrecognized modes map to 0, which no daemon profile uses.
    pub fn profile_id(&self) -> u8 {
        match self {
            SyncMode::Grandmaster => 2,
            SyncMode::BoundaryClock => 1,
            SyncMode::SlaveClock => 3,
            SyncMode::Other(_) => 0,
        }
    }

    /// Whether the node consumes a GPS reference in this mode.
    pub fn gps_enabled(&self) -> bool {
        matches!(self, SyncMode::Grandmaster)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SyncMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SyncMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(SyncMode::from_label(&label))
    }
}

/// Operational state reported by the synchronization daemon as a small
/// integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaemonStatus {
    /// Locked and serving time.
    Normal,

    /// Starting up, no lock yet.
    Initializing,

    /// Busy applying a configuration change.
    Busy,

    /// Daemon rejected its configuration.
    Invalid,
}

impl DaemonStatus {
    /// Decode a daemon status code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(DaemonStatus::Normal),
            2 => Some(DaemonStatus::Initializing),
            3 => Some(DaemonStatus::Busy),
            4 => Some(DaemonStatus::Invalid),
            _ => None,
        }
    }

    /// The code the daemon reports for this state.
    pub fn code(&self) -> i32 {
        match self {
            DaemonStatus::Normal => 1,
            DaemonStatus::Initializing => 2,
            DaemonStatus::Busy => 3,
            DaemonStatus::Invalid => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DaemonStatus::Normal => "Normal",
            DaemonStatus::Initializing => "Initializing",
            DaemonStatus::Busy => "Busy",
            DaemonStatus::Invalid => "Invalid",
        }
    }

    /// Human-readable rendering of an arbitrary status code.
    pub fn describe(code: i32) -> String {
        match Self::from_code(code) {
            Some(status) => status.label().to_string(),
            None => format!("unknown: {}", code),
        }
    }
}

impl fmt::Display for DaemonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
