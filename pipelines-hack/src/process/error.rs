//! Command execution error types.

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started or awaited.
    #[error("[{dir}] failed to run {program} {args:?}: {source}")]
    Spawn {
        dir: String,
        program: String,
        args: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("[{dir}] failed to run {program} {args:?}: {status}\n{output}")]
    Failed {
        dir: String,
        program: String,
        args: Vec<String>,
        status: String,
        /// Combined stdout and stderr.
        output: String,
    },

    /// Cancellation was requested before the process was launched.
    #[error("cancelled before running {program} {args:?}")]
    Cancelled { program: String, args: Vec<String> },
}

impl CommandError {
    /// Returns the captured output of a failed command, if any.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}
