//! Error types for the syncfleet daemon

use syncfleet_controller::ControllerError;
use thiserror::Error;

/// Daemon errors
#[derive(Error, Debug)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Seed file could not be decoded
    #[error("Seed error: {0}")]
    Seed(#[from] serde_yaml::Error),

    /// Reconciliation failure
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DaemonError::Config("missing template".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing template");
    }
}
