//! Manifest apply error types.

use crate::process::CommandError;
use thiserror::Error;

/// Errors that can occur while applying manifests.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A requested version has no manifest directory.
    #[error("Version directory {path} does not exist")]
    MissingDirectory { path: String },

    /// Listing the manifest root failed.
    #[error("Failed to read {path} directory: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `kubectl apply` failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}
