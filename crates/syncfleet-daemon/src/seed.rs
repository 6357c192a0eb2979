//! Seed file loading
//!
//! Standalone deployments have no external source of nodes or sync
//! configs, so the daemon can prime its in-memory cluster from a YAML
//! file at startup.

use serde::Deserialize;
use std::path::Path;
use syncfleet_controller::InMemoryCluster;
use syncfleet_types::{Node, SyncConfig};

use crate::error::DaemonResult;

/// On-disk seed document
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    /// Fleet nodes to register
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Sync configs to register
    #[serde(default)]
    pub configs: Vec<SyncConfig>,
}

/// Load a seed file into the cluster, returning (nodes, configs) counts.
pub async fn load_seed(path: &Path, cluster: &InMemoryCluster) -> DaemonResult<(usize, usize)> {
    let raw = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&raw)?;

    let nodes = seed.nodes.len();
    let configs = seed.configs.len();

    for node in seed.nodes {
        cluster.add_node(node);
    }
    for config in seed.configs {
        cluster.add_sync_config(config);
    }

    Ok((nodes, configs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaemonError;
    use std::path::PathBuf;
    use syncfleet_types::SyncMode;
    use uuid::Uuid;

    fn write_seed(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("syncfleet-seed-{}.yaml", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_seed_populates_cluster() {
        let path = write_seed(
            r#"
nodes:
  - name: gm-1
    labels:
      timing/role: grandmaster
  - name: bc-1
    labels:
      timing/role: boundary
configs:
  - name: fleet-gm
    namespace: timing
    spec:
      nodeSelector:
        timing/role: grandmaster
      mode: T-GM.8275.1
      interfaces:
        - ethPort: 2
          role: Master
          syncE: true
"#,
        );

        let cluster = InMemoryCluster::new();
        let (nodes, configs) = load_seed(&path, &cluster).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(nodes, 2);
        assert_eq!(configs, 1);

        let config = cluster.get_sync_config("timing", "fleet-gm").unwrap();
        assert_eq!(config.spec.mode, SyncMode::Grandmaster);
        assert_eq!(config.spec.interfaces.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_sections_default_empty() {
        let path = write_seed(
            r#"
nodes:
  - name: sc-1
"#,
        );

        let cluster = InMemoryCluster::new();
        let (nodes, configs) = load_seed(&path, &cluster).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(nodes, 1);
        assert_eq!(configs, 0);
    }

    #[tokio::test]
    async fn test_malformed_seed_is_reported() {
        let path = write_seed("nodes: [this is: not a node]");

        let cluster = InMemoryCluster::new();
        let result = load_seed(&path, &cluster).await;
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(DaemonError::Seed(_))));
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_reported() {
        let path = std::env::temp_dir().join(format!("syncfleet-absent-{}.yaml", Uuid::new_v4()));

        let cluster = InMemoryCluster::new();
        let result = load_seed(&path, &cluster).await;

        assert!(matches!(result, Err(DaemonError::Io(_))));
    }
}
