//! Reconcile pass
//!
//! One pass walks every desired-state record, renders the manifest for
//! each matched node, and converges the cluster: create what is missing,
//! repair what drifted, leave the rest alone. Object comparison is
//! one-directional, so fields the cluster adds on its own never count as
//! drift. The pass finishes by replacing each record's status and making
//! sure the node pollers are running.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use syncfleet_poller::PollerSupervisor;
use syncfleet_render::{
    is_derivative_equal, render_manifest, PortConfig, RenderContext, RenderedObject,
};
use syncfleet_types::{NodeSyncStatus, SyncConfig, SyncConfigStatus};

use crate::cluster::ClusterApi;
use crate::error::{ClusterError, ControllerError, ControllerResult};

/// Counters from one reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Desired-state records walked.
    pub configs: usize,
    /// Node renders performed.
    pub nodes: usize,
    /// Objects created.
    pub created: usize,
    /// Objects updated after drift.
    pub updated: usize,
    /// Objects already in sync.
    pub unchanged: usize,
}

enum Applied {
    Created,
    Updated,
    Unchanged,
}

/// Drives the cluster toward the declared state, one pass at a time.
pub struct Reconciler<C> {
    cluster: Arc<C>,
    supervisor: Arc<PollerSupervisor>,
    template_path: PathBuf,
}

impl<C: ClusterApi> Reconciler<C> {
    pub fn new(
        cluster: Arc<C>,
        supervisor: Arc<PollerSupervisor>,
        template_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cluster,
            supervisor,
            template_path: template_path.into(),
        }
    }

    /// Run one full pass over every desired-state record.
    ///
    /// The manifest template and the port environment are re-read on
    /// every pass, so both can change between passes without a restart.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> ControllerResult<ReconcileOutcome> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|source| ControllerError::TemplateRead {
                path: self.template_path.clone(),
                source,
            })?;

        let configs = match self.cluster.list_sync_configs().await {
            Ok(configs) => configs,
            Err(ClusterError::NotFound(detail)) => {
                debug!(detail = %detail, "no sync configs to reconcile");
                return Ok(ReconcileOutcome::default());
            }
            Err(error) => return Err(error.into()),
        };

        let ports = PortConfig::from_env();
        let mut outcome = ReconcileOutcome::default();

        for config in configs {
            outcome.configs += 1;
            self.reconcile_config(&config, &template, ports, &mut outcome)
                .await?;
        }

        info!(
            configs = outcome.configs,
            nodes = outcome.nodes,
            created = outcome.created,
            updated = outcome.updated,
            unchanged = outcome.unchanged,
            "reconcile pass complete"
        );
        Ok(outcome)
    }

    async fn reconcile_config(
        &self,
        config: &SyncConfig,
        template: &str,
        ports: PortConfig,
        outcome: &mut ReconcileOutcome,
    ) -> ControllerResult<()> {
        let nodes = match self.cluster.list_nodes(&config.spec.node_selector).await {
            Ok(nodes) => nodes,
            Err(ClusterError::NotFound(detail)) => {
                debug!(
                    config = %config.qualified_name(),
                    detail = %detail,
                    "node listing unavailable, skipping record"
                );
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        let mut status = SyncConfigStatus::default();

        for node in &nodes {
            outcome.nodes += 1;
            let context = RenderContext::new(config, node, ports);
            let objects = render_manifest(template, &context.values())?;

            for object in objects {
                match self.apply_object(object).await? {
                    Applied::Created => outcome.created += 1,
                    Applied::Updated => outcome.updated += 1,
                    Applied::Unchanged => outcome.unchanged += 1,
                }
            }

            status.nodes.push(NodeSyncStatus::unknown(&node.name));
            self.ensure_pollers(&context);
        }

        self.cluster
            .update_status(&config.namespace, &config.name, status)
            .await?;

        Ok(())
    }

    /// Converge one rendered object: create it, update it, or leave it.
    async fn apply_object(&self, mut rendered: RenderedObject) -> ControllerResult<Applied> {
        let reference = rendered.object_ref();
        match self.cluster.get_object(&reference).await? {
            None => {
                info!(object = %reference, "creating object");
                self.cluster.create_object(rendered).await?;
                Ok(Applied::Created)
            }
            Some(observed) => {
                if is_derivative_equal(rendered.value(), observed.value()) {
                    debug!(object = %reference, "object in sync");
                    return Ok(Applied::Unchanged);
                }
                // Updates must carry the revision they replace.
                if let Some(version) = observed.resource_version() {
                    rendered.set_resource_version(version);
                }
                info!(object = %reference, "updating drifted object");
                self.cluster.update_object(rendered).await?;
                Ok(Applied::Updated)
            }
        }
    }

    /// Keep the per-node pollers alive. The GPS poller only runs for
    /// modes that use a receiver.
    fn ensure_pollers(&self, context: &RenderContext) {
        let tsync_endpoint = format!(
            "http://{}-tsyncd.{}:{}",
            context.service_prefix, context.namespace, context.ports.tsync_port
        );
        self.supervisor
            .ensure_tsync(&context.node_name, &tsync_endpoint);

        if context.enable_gps {
            let gpsd_endpoint = format!(
                "{}-gpsd.{}:{}",
                context.service_prefix, context.namespace, context.ports.gps_port
            );
            self.supervisor
                .ensure_gpsd(&context.node_name, &gpsd_endpoint);
        }
    }
}
