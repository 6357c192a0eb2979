//! Cluster access trait
//!
//! The reconciler only ever talks to the cluster through [`ClusterApi`],
//! so tests and the standalone daemon can run against the in-memory
//! implementation while a deployment wires in a real API client.

use std::collections::BTreeMap;

use async_trait::async_trait;

use syncfleet_render::{ObjectRef, RenderedObject};
use syncfleet_types::{Node, SyncConfig, SyncConfigStatus};

use crate::error::ClusterResult;

/// Operations a reconcile pass needs from the cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// All desired-state records, across namespaces.
    async fn list_sync_configs(&self) -> ClusterResult<Vec<SyncConfig>>;

    /// Nodes whose labels contain every pair in `selector`. An empty
    /// selector matches the whole fleet.
    async fn list_nodes(&self, selector: &BTreeMap<String, String>) -> ClusterResult<Vec<Node>>;

    /// Fetch one object, `None` when it does not exist.
    async fn get_object(&self, reference: &ObjectRef) -> ClusterResult<Option<RenderedObject>>;

    /// Create an object that must not already exist.
    async fn create_object(&self, object: RenderedObject) -> ClusterResult<()>;

    /// Replace an existing object. The submitted `resourceVersion` must
    /// match the stored one.
    async fn update_object(&self, object: RenderedObject) -> ClusterResult<()>;

    /// Replace the status of one desired-state record wholesale.
    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: SyncConfigStatus,
    ) -> ClusterResult<()>;
}
