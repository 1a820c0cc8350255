//! Checkout synchronisation error types.

use crate::process::CommandError;
use thiserror::Error;

/// Errors that can occur while syncing a working checkout.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The requested branch does not exist on the remote.
    #[error("branch {branch} does not exist in remote repository {remote}")]
    BranchNotFound { branch: String, remote: String },

    /// The derived branch name is not a valid git reference.
    #[error("invalid branch name '{name}': {message}")]
    InvalidBranchName { name: String, message: String },

    /// A git command failed.
    #[error("failed to {step} in {dir}: {source}")]
    Command {
        step: &'static str,
        dir: String,
        #[source]
        source: CommandError,
    },

    /// The checkout directory could not be prepared.
    #[error("failed to create checkout directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
