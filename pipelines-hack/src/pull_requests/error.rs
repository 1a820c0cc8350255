//! Pull request error types.

use crate::process::CommandError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while committing and opening a pull request.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A git or gh invocation failed.
    #[error("Failed to {step} in '{dir}': {source}")]
    Command {
        step: &'static str,
        dir: String,
        #[source]
        source: CommandError,
    },

    /// Rendering the commit message or PR body failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
