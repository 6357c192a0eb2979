//! In-memory cluster
//!
//! Backs the standalone daemon and the test suite. Objects live in
//! concurrent maps and resource versions come from a process-local
//! counter, which is enough to exercise the reconciler's optimistic
//! concurrency handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use syncfleet_render::{ObjectRef, RenderedObject};
use syncfleet_types::{Node, SyncConfig, SyncConfigStatus};

use crate::cluster::ClusterApi;
use crate::error::{ClusterError, ClusterResult};

/// Cluster state held entirely in process memory.
pub struct InMemoryCluster {
    configs: DashMap<String, SyncConfig>,
    nodes: DashMap<String, Node>,
    objects: DashMap<ObjectRef, RenderedObject>,
    version_counter: AtomicU64,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
            nodes: DashMap::new(),
            objects: DashMap::new(),
            version_counter: AtomicU64::new(1),
        }
    }

    /// Register a fleet node.
    pub fn add_node(&self, node: Node) {
        self.nodes.insert(node.name.clone(), node);
    }

    /// Register a desired-state record.
    pub fn add_sync_config(&self, config: SyncConfig) {
        self.configs.insert(config.qualified_name(), config);
    }

    /// Current copy of one desired-state record.
    pub fn get_sync_config(&self, namespace: &str, name: &str) -> Option<SyncConfig> {
        self.configs
            .get(&format!("{namespace}/{name}"))
            .map(|entry| entry.clone())
    }

    /// Store an object verbatim, bypassing version checks. Test hook for
    /// simulating out-of-band edits.
    pub fn insert_object(&self, object: RenderedObject) {
        self.objects.insert(object.object_ref(), object);
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn next_version(&self) -> String {
        self.version_counter.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterApi for InMemoryCluster {
    async fn list_sync_configs(&self) -> ClusterResult<Vec<SyncConfig>> {
        let mut configs: Vec<SyncConfig> =
            self.configs.iter().map(|entry| entry.value().clone()).collect();
        // Deterministic order keeps reconcile logs and tests stable.
        configs.sort_by_key(|config| config.qualified_name());
        Ok(configs)
    }

    async fn list_nodes(&self, selector: &BTreeMap<String, String>) -> ClusterResult<Vec<Node>> {
        let mut nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|entry| entry.value().matches_selector(selector))
            .map(|entry| entry.value().clone())
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(nodes)
    }

    async fn get_object(&self, reference: &ObjectRef) -> ClusterResult<Option<RenderedObject>> {
        Ok(self.objects.get(reference).map(|entry| entry.clone()))
    }

    async fn create_object(&self, mut object: RenderedObject) -> ClusterResult<()> {
        let version = self.next_version();
        match self.objects.entry(object.object_ref()) {
            Entry::Occupied(entry) => Err(ClusterError::Conflict(format!(
                "object already exists: {}",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                object.set_resource_version(&version);
                entry.insert(object);
                Ok(())
            }
        }
    }

    async fn update_object(&self, mut object: RenderedObject) -> ClusterResult<()> {
        let version = self.next_version();
        match self.objects.entry(object.object_ref()) {
            Entry::Occupied(mut entry) => {
                if object.resource_version() != entry.get().resource_version() {
                    return Err(ClusterError::Conflict(format!(
                        "stale resourceVersion for {}",
                        entry.key()
                    )));
                }
                object.set_resource_version(&version);
                entry.insert(object);
                Ok(())
            }
            Entry::Vacant(entry) => Err(ClusterError::NotFound(format!(
                "object not found: {}",
                entry.key()
            ))),
        }
    }

    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: SyncConfigStatus,
    ) -> ClusterResult<()> {
        match self.configs.get_mut(&format!("{namespace}/{name}")) {
            Some(mut config) => {
                config.status = status;
                Ok(())
            }
            None => Err(ClusterError::NotFound(format!(
                "sync config not found: {namespace}/{name}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use syncfleet_types::{SyncConfigSpec, SyncMode};

    fn create_test_object(name: &str) -> RenderedObject {
        RenderedObject::from_value(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": name, "namespace": "timing"},
            "spec": {"port": 50051},
        }))
    }

    fn create_test_config(name: &str) -> SyncConfig {
        SyncConfig {
            name: name.to_string(),
            namespace: "timing".to_string(),
            spec: SyncConfigSpec {
                node_selector: BTreeMap::new(),
                mode: SyncMode::BoundaryClock,
                interfaces: Vec::new(),
            },
            status: SyncConfigStatus::default(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_a_resource_version() {
        let cluster = InMemoryCluster::new();
        cluster.create_object(create_test_object("svc-a")).await.unwrap();

        let stored = cluster
            .get_object(&create_test_object("svc-a").object_ref())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.resource_version().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let cluster = InMemoryCluster::new();
        cluster.create_object(create_test_object("svc-a")).await.unwrap();

        let err = cluster
            .create_object(create_test_object("svc-a"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClusterError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_requires_matching_version() {
        let cluster = InMemoryCluster::new();
        cluster.create_object(create_test_object("svc-a")).await.unwrap();

        // Submitting without the stored version is a conflict.
        let err = cluster
            .update_object(create_test_object("svc-a"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClusterError::Conflict(_)));

        let stored = cluster
            .get_object(&create_test_object("svc-a").object_ref())
            .await
            .unwrap()
            .unwrap();
        let old_version = stored.resource_version().unwrap().to_string();

        let mut updated = create_test_object("svc-a");
        updated.set_resource_version(&old_version);
        cluster.update_object(updated).await.unwrap();

        let stored = cluster
            .get_object(&create_test_object("svc-a").object_ref())
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.resource_version().unwrap(), old_version);
    }

    #[tokio::test]
    async fn test_update_missing_object_is_not_found() {
        let cluster = InMemoryCluster::new();
        let err = cluster
            .update_object(create_test_object("svc-a"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClusterError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_node_listing_applies_the_selector() {
        let cluster = InMemoryCluster::new();
        cluster.add_node(Node::new("sts-1").with_label("sync", "enabled"));
        cluster.add_node(Node::new("sts-2"));

        let all = cluster.list_nodes(&BTreeMap::new()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "sts-1");

        let mut selector = BTreeMap::new();
        selector.insert("sync".to_string(), "enabled".to_string());
        let matched = cluster.list_nodes(&selector).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "sts-1");
    }

    #[tokio::test]
    async fn test_status_update_replaces_wholesale() {
        let cluster = InMemoryCluster::new();
        cluster.add_sync_config(create_test_config("bc-west"));

        let mut status = SyncConfigStatus::default();
        status.nodes.push(syncfleet_types::NodeSyncStatus::unknown("sts-1"));
        cluster.update_status("timing", "bc-west", status).await.unwrap();

        let stored = cluster.get_sync_config("timing", "bc-west").unwrap();
        assert_eq!(stored.status.nodes.len(), 1);

        cluster
            .update_status("timing", "bc-west", SyncConfigStatus::default())
            .await
            .unwrap();
        let stored = cluster.get_sync_config("timing", "bc-west").unwrap();
        assert!(stored.status.nodes.is_empty());

        let err = cluster
            .update_status("timing", "missing", SyncConfigStatus::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClusterError::NotFound(_)));
    }
}
