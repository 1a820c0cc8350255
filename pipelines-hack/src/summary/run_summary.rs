//! Run summary types.

use super::result::BranchOutcome;
use crate::pull_requests::PublishStatus;

/// Summary of a complete label update run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories visited.
    pub repositories: usize,

    /// Number of branches whose Dockerfiles were patched.
    pub branches_processed: usize,

    /// Number of branches skipped (no Dockerfiles, or none patchable).
    pub branches_skipped: usize,

    /// Number of Dockerfiles rewritten.
    pub dockerfiles_updated: usize,

    /// Number of Dockerfiles already up to date.
    pub dockerfiles_unchanged: usize,

    /// Number of Dockerfiles that failed to patch.
    pub dockerfiles_failed: usize,

    /// Number of PRs opened.
    pub prs_created: usize,

    /// Number of existing PRs refreshed by a push.
    pub prs_updated: usize,

    /// Number of branches with nothing to publish.
    pub prs_unchanged: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a branch outcome.
    pub fn record(&mut self, outcome: &BranchOutcome) {
        match outcome {
            BranchOutcome::Skipped { .. } => self.branches_skipped += 1,
            BranchOutcome::Patched {
                updated,
                unchanged,
                failed,
                publish,
                ..
            } => {
                self.branches_processed += 1;
                self.dockerfiles_updated += updated;
                self.dockerfiles_unchanged += unchanged;
                self.dockerfiles_failed += failed;
                match publish {
                    Some(PublishStatus::Created { .. }) => self.prs_created += 1,
                    Some(PublishStatus::Updated { .. }) => self.prs_updated += 1,
                    Some(PublishStatus::NoChanges | PublishStatus::NothingToCommit) => {
                        self.prs_unchanged += 1;
                    }
                    None => {}
                }
            }
        }
    }

    /// Returns true if any Dockerfile failed to patch.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.dockerfiles_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_record_outcomes() {
        let mut summary = RunSummary::new(false);

        summary.record(&BranchOutcome::Patched {
            repository: "operator".to_string(),
            branch: "main".to_string(),
            updated: 2,
            unchanged: 1,
            failed: 1,
            publish: Some(PublishStatus::Created {
                url: "https://example.com/pr".to_string(),
            }),
        });
        summary.record(&BranchOutcome::Patched {
            repository: "operator".to_string(),
            branch: "next".to_string(),
            updated: 0,
            unchanged: 3,
            failed: 0,
            publish: Some(PublishStatus::NoChanges),
        });
        summary.record(&BranchOutcome::Skipped {
            repository: "cli".to_string(),
            branch: "main".to_string(),
            reason: "no Dockerfiles".to_string(),
        });

        assert_eq!(summary.branches_processed, 2);
        assert_eq!(summary.branches_skipped, 1);
        assert_eq!(summary.dockerfiles_updated, 2);
        assert_eq!(summary.dockerfiles_unchanged, 4);
        assert_eq!(summary.prs_created, 1);
        assert_eq!(summary.prs_unchanged, 1);
        assert!(summary.has_failures());
    }
}
