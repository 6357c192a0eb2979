//! # Syncfleet Controller - Desired-State Reconciliation
//!
//! This crate drives a fleet of time-synchronization nodes toward the
//! state declared in their [`SyncConfig`](syncfleet_types::SyncConfig)
//! records. One reconcile pass renders a manifest per matched node,
//! creates or repairs the corresponding cluster objects, replaces the
//! record's status, and makes sure the background pollers for every node
//! are running.
//!
//! ## Key Components
//!
//! - [`ClusterApi`]: the cluster surface the reconciler targets
//! - [`InMemoryCluster`]: cluster implementation for tests and the
//!   standalone daemon
//! - [`Reconciler`]: the pass itself, lookup-or-create-or-update per
//!   rendered object

#![deny(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod memory;
pub mod reconciler;

pub use cluster::ClusterApi;
pub use error::{ClusterError, ClusterResult, ControllerError, ControllerResult};
pub use memory::InMemoryCluster;
pub use reconciler::{ReconcileOutcome, Reconciler};
