//! Syncfleet Types - Core types for time-synchronization fleet control
//!
//! Syncfleet keeps a fleet of time-synchronization nodes configured from a
//! declarative `SyncConfig` record and reports per-node daemon status back
//! onto that record.
//!
//! ## Architectural Boundaries
//!
//! - **syncfleet-types** owns: the desired-state model, mode and status
//!   vocabularies, port-mask derivation
//! - **syncfleet-render** owns: turning a `SyncConfig` + node into concrete
//!   manifest objects
//! - **syncfleet-controller** owns: diffing rendered objects against the
//!   cluster and applying the difference
//!
//! ## Key Concepts
//!
//! - **SyncConfig**: Declarative record selecting nodes and describing the
//!   synchronization role they should run
//! - **SyncMode**: Grandmaster / boundary-clock / slave-clock vocabulary with
//!   the ITU-T profile labels the daemons understand
//! - **PortMasks**: Bitmask derivation from the interface list
//! - **NodeSyncStatus**: Per-node status published back onto the config

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod masks;
pub mod mode;

// Re-export main types
pub use config::{
    GpsReport, InterfaceSpec, Node, NodeSyncStatus, PortRole, SyncConfig, SyncConfigSpec,
    SyncConfigStatus, TsyncReport,
};
pub use masks::PortMasks;
pub use mode::{DaemonStatus, SyncMode};
