//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// A checkout could not be synchronised.
    #[error(transparent)]
    Sync(#[from] crate::checkout::SyncError),

    /// Committing, pushing or opening a PR failed.
    #[error(transparent)]
    Publish(#[from] crate::pull_requests::PublishError),

    /// Template registration or rendering failed.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Manifest generation failed.
    #[error(transparent)]
    Generate(#[from] crate::generate::GenerateError),

    /// Applying manifests failed.
    #[error(transparent)]
    Apply(#[from] crate::apply::ApplyError),

    /// A required executable is not on `PATH`.
    #[error("Couldn't find {tool} in your path")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    /// Preparing the work directory or listing Dockerfiles failed.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
