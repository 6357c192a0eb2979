//! Syncfleet daemon - fleet time synchronization control loop
//!
//! The syncfleet daemon provides:
//! - A reconciliation loop converging node deployments on their declared sync role
//! - Manifest rendering from the shared deployment template
//! - Supervised pollers tracking each node's sync daemon and GNSS receiver

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod scheduler;
mod seed;

// `crate::` keeps the module distinct from the config crate itself.
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::scheduler::ResyncScheduler;
use syncfleet_controller::{InMemoryCluster, Reconciler};
use syncfleet_poller::PollerSupervisor;
use tokio::time::Duration;

/// Syncfleet daemon CLI
#[derive(Parser)]
#[command(name = "syncfleetd")]
#[command(about = "Syncfleet daemon - fleet time synchronization control loop", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SYNCFLEET_CONFIG")]
    config: Option<String>,

    /// Manifest template path
    #[arg(short, long, env = "SYNCFLEET_TEMPLATE")]
    template: Option<PathBuf>,

    /// Seed file with nodes and sync configs
    #[arg(short, long, env = "SYNCFLEET_SEED")]
    seed: Option<PathBuf>,

    /// Resync interval in seconds
    #[arg(long, env = "SYNCFLEET_RESYNC_SECS")]
    resync_secs: Option<u64>,

    /// Log level
    #[arg(long, env = "SYNCFLEET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "SYNCFLEET_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(template) = cli.template {
        config.controller.template_path = template;
    }
    if let Some(seed) = cli.seed {
        config.controller.seed_path = Some(seed);
    }
    if let Some(secs) = cli.resync_secs {
        config.controller.resync_interval_secs = secs;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else if config.logging.timestamps {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }

    // Print startup banner
    println!(
        r#"
  Syncfleet - Fleet Time Synchronization Controller
  Version: {}
  Template: {}
  Resync: every {}s
"#,
        env!("CARGO_PKG_VERSION"),
        config.controller.template_path.display(),
        config.controller.resync_interval_secs
    );

    let cluster = Arc::new(InMemoryCluster::new());

    if let Some(path) = &config.controller.seed_path {
        let (nodes, configs) = seed::load_seed(path, &cluster).await?;
        tracing::info!(nodes, configs, path = %path.display(), "Seed file applied");
    }

    let supervisor = Arc::new(PollerSupervisor::with_timings(config.pollers.timings()));
    let reconciler = Arc::new(Reconciler::new(
        cluster.clone(),
        supervisor.clone(),
        config.controller.template_path.clone(),
    ));

    // Surface poller activity in the daemon log
    let mut events = supervisor.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::debug!(
                node = %event.node,
                kind = %event.kind,
                detail = ?event.detail,
                "Poller event"
            );
        }
    });

    let (scheduler, resync_rx) = ResyncScheduler::new(
        Duration::from_secs(config.controller.resync_interval_secs),
        reconciler,
    );
    let loop_handle = tokio::spawn(scheduler.clone().start(resync_rx));

    tracing::info!("Daemon started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    scheduler.stop().await;
    loop_handle.abort();
    supervisor.stop_all();

    tracing::info!("Daemon stopped");
    Ok(())
}
