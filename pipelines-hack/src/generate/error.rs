//! Manifest generation error types.

use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while generating manifests.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Rendering or writing a manifest failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Preparing an output directory failed.
    #[error("Failed to prepare '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
