//! Pull request status types.

use serde::Serialize;

/// Outcome of publishing a checkout's changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    /// Working tree was clean; nothing was committed or pushed.
    NoChanges,

    /// The commit found nothing staged; nothing was pushed.
    NothingToCommit,

    /// A new PR was opened.
    Created {
        /// URL printed by `gh pr create`.
        url: String,
    },

    /// An open PR already existed and was refreshed by the force-push.
    Updated {
        /// PR number as reported by `gh pr list`.
        number: String,
    },
}

impl PublishStatus {
    /// Returns the status as a string for logs and summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoChanges => "no_changes",
            Self::NothingToCommit => "nothing_to_commit",
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
        }
    }
}
