//! Controller error types

use std::path::PathBuf;

use syncfleet_render::RenderError;
use thiserror::Error;

/// Failures surfaced by a [`ClusterApi`](crate::ClusterApi)
/// implementation.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// The addressed object or collection does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write raced another writer or an object already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other API failure.
    #[error("API error: {0}")]
    Api(String),
}

/// Result type for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Failures that abort a reconcile pass.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// The manifest template could not be read from disk.
    #[error("Failed to read manifest template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A cluster operation failed.
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),
}

/// Result type for reconciliation operations.
pub type ControllerResult<T> = Result<T, ControllerError>;
