//! Configuration for the syncfleet daemon

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use syncfleet_poller::PollerTimings;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Controller configuration
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Poller timing configuration
    #[serde(default)]
    pub pollers: PollerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            pollers: PollerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Manifest template path
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Resync interval in seconds
    #[serde(default = "default_resync_interval")]
    pub resync_interval_secs: u64,

    /// Seed file applied to the in-memory cluster at startup
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            resync_interval_secs: 30,
            seed_path: None,
        }
    }
}

/// Poller timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds before a daemon poller's first connection attempt
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: u64,

    /// Seconds between failed connection attempts
    #[serde(default = "default_connect_retry")]
    pub connect_retry_secs: u64,

    /// Seconds before an in-flight query is abandoned
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Seconds between polling cycles
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 30,
            connect_retry_secs: 5,
            query_timeout_secs: 30,
            cycle_interval_secs: 30,
        }
    }
}

impl PollerConfig {
    /// Convert to the timing set the poller supervisor takes.
    pub fn timings(&self) -> PollerTimings {
        PollerTimings {
            initial_delay: Duration::from_secs(self.initial_delay_secs),
            connect_retry: Duration::from_secs(self.connect_retry_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
            cycle_interval: Duration::from_secs(self.cycle_interval_secs),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            timestamps: true,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_template_path() -> PathBuf {
    PathBuf::from("assets/sync-deployment.yaml")
}

fn default_resync_interval() -> u64 {
    30
}

fn default_initial_delay() -> u64 {
    30
}

fn default_connect_retry() -> u64 {
    5
}

fn default_query_timeout() -> u64 {
    30
}

fn default_cycle_interval() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with SYNCFLEET_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("SYNCFLEET")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
