//! Dockerfile patching error types.

use thiserror::Error;

/// Errors that can occur while patching a Dockerfile.
#[derive(Debug, Error)]
pub enum PatchError {
    /// No `LABEL` instruction was found.
    #[error("no LABEL block found in Dockerfile")]
    MissingLabelBlock,

    /// No label declaration carries a `name` key.
    #[error("LABEL block missing required 'name' key")]
    MissingNameKey,

    /// Reading or writing the Dockerfile failed.
    #[error("Failed to access Dockerfile '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The latest digest of a base image could not be determined.
#[derive(Debug, Error)]
#[error("could not determine latest digest of {reference} using skopeo, docker, or podman")]
pub struct DigestError {
    pub reference: String,
}
