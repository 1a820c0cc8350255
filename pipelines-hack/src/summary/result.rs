//! Per-branch processing results.

use crate::pull_requests::PublishStatus;

/// Result of processing one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    /// The branch had nothing to patch.
    Skipped {
        /// Repository name.
        repository: String,
        branch: String,
        /// Reason for skipping.
        reason: String,
    },

    /// Dockerfiles were patched.
    Patched {
        /// Repository name.
        repository: String,
        branch: String,
        /// Files whose content changed.
        updated: usize,
        /// Files already carrying the label and digest.
        unchanged: usize,
        /// Files that could not be patched.
        failed: usize,
        /// Publish result; `None` in dry-run mode.
        publish: Option<PublishStatus>,
    },
}
