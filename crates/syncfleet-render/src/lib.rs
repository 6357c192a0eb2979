//! Manifest rendering for the syncfleet controller.
//!
//! This crate turns a manifest template plus a per-node context into the
//! concrete objects the reconciler submits to the cluster. Rendering is a
//! fixed pipeline:
//!
//! 1. [`RenderContext`] flattens a desired-state record and a target node
//!    into a map of substitution values.
//! 2. [`substitute`] replaces every `{{ key }}` placeholder, failing on
//!    keys the context does not define.
//! 3. [`render_manifest`] splits the substituted text into YAML documents
//!    and decodes each into an untyped [`RenderedObject`].
//!
//! Comparison lives here too: [`is_derivative_equal`] decides whether an
//! observed cluster object still matches what a template would produce,
//! ignoring fields only the cluster wrote.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", deny(missing_docs))]

pub mod context;
pub mod derivative;
pub mod error;
pub mod manifest;
pub mod template;

pub use context::{
    PortConfig, RenderContext, DEFAULT_GPS_PORT, DEFAULT_TSYNC_PORT, GPS_PORT_ENV, TSYNC_PORT_ENV,
};
pub use derivative::is_derivative_equal;
pub use error::{RenderError, RenderResult};
pub use manifest::{render_manifest, ObjectRef, RenderedObject, DOCUMENT_SEPARATOR};
pub use template::substitute;
