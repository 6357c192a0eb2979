//! Rendering error types

use thiserror::Error;

/// Errors produced while rendering a manifest template.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template referenced a key the context does not define.
    #[error("unknown template field '{key}'")]
    MissingField {
        /// Placeholder key as written in the template, trimmed.
        key: String,
    },

    /// A `{{` without a matching `}}`.
    #[error("unterminated placeholder at byte {offset}")]
    UnterminatedPlaceholder {
        /// Byte offset of the opening braces in the template.
        offset: usize,
    },

    /// A substituted document failed to decode as YAML.
    #[error("failed to decode manifest document {index}: {source}")]
    Decode {
        /// Zero-based position of the document in the split output.
        index: usize,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
