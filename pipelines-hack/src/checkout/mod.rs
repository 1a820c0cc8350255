//! Working checkout synchronisation.
//!
//! A [`WorkingCheckout`] is a local directory bound to one repository and one
//! target branch. It survives between runs: the next run fetches into it
//! instead of cloning again, resets away any half-finished edits, and moves
//! the derived branch back onto the remote branch tip.

mod error;

pub use error::SyncError;

use crate::process::CommandRunner;
use bstr::ByteSlice;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A local clone bound to a (repository, branch) pair.
#[derive(Debug, Clone)]
pub struct WorkingCheckout {
    dir: PathBuf,
    remote_url: String,
    branch: String,
    derived_branch: String,
}

impl WorkingCheckout {
    /// Creates a checkout description; nothing touches the disk until [`Self::sync`].
    pub fn new(
        dir: impl Into<PathBuf>,
        remote_url: impl Into<String>,
        branch: impl Into<String>,
        derived_branch: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            remote_url: remote_url.into(),
            branch: branch.into(),
            derived_branch: derived_branch.into(),
        }
    }

    /// Returns the checkout directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns whether the directory already holds a git repository.
    pub fn is_initialized(&self) -> bool {
        self.dir.join(".git").exists()
    }

    /// Brings the checkout to the remote branch tip and checks out the derived branch.
    ///
    /// The remote branch is verified to exist before any local branch is
    /// created or reset.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::BranchNotFound`] if the remote lacks the target
    /// branch, and [`SyncError::Command`] if any git invocation fails.
    pub async fn sync(&self, runner: &dyn CommandRunner) -> Result<(), SyncError> {
        validate_branch_name(&self.derived_branch)?;

        if self.is_initialized() {
            debug!(dir = %self.dir.display(), "Checkout exists, fetching");
            self.git(runner, "fetch repository", &["fetch", "--all"])
                .await?;
        } else {
            info!(dir = %self.dir.display(), remote = %self.remote_url, "Cloning repository");
            std::fs::create_dir_all(&self.dir).map_err(|source| SyncError::Io {
                path: self.dir.display().to_string(),
                source,
            })?;
            self.git(runner, "clone repository", &["clone", &self.remote_url, "."])
                .await?;
        }

        self.git(runner, "reset working tree", &["reset", "--hard", "HEAD", "--"])
            .await?;

        let heads = self
            .git(
                runner,
                "list remote branches",
                &["ls-remote", "--heads", "origin", &self.branch],
            )
            .await?;
        if heads.trim().is_empty() {
            return Err(SyncError::BranchNotFound {
                branch: self.branch.clone(),
                remote: self.remote_url.clone(),
            });
        }

        let remote_ref = format!("origin/{}", self.branch);
        self.git(
            runner,
            "check out target branch",
            &["checkout", &remote_ref, "-B", &self.branch],
        )
        .await?;
        self.git(
            runner,
            "check out derived branch",
            &["checkout", "-B", &self.derived_branch],
        )
        .await?;

        Ok(())
    }

    async fn git(
        &self,
        runner: &dyn CommandRunner,
        step: &'static str,
        args: &[&str],
    ) -> Result<String, SyncError> {
        runner
            .run(&self.dir, "git", args)
            .await
            .map_err(|source| SyncError::Command {
                step,
                dir: self.dir.display().to_string(),
                source,
            })
    }
}

/// Rejects names git would refuse as `refs/heads/<name>`.
fn validate_branch_name(name: &str) -> Result<(), SyncError> {
    let full = format!("refs/heads/{name}");
    gix_validate::reference::name(full.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| SyncError::InvalidBranchName {
            name: name.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;
    use tempfile::TempDir;

    const REMOTE: &str = "https://github.com/openshift-pipelines/operator.git";

    fn checkout(dir: &Path) -> WorkingCheckout {
        WorkingCheckout::new(
            dir,
            REMOTE,
            "release-v1.21.x",
            "actions/update/dockerfile-labels-1.21release-v1.21.x",
        )
    }

    #[tokio::test]
    async fn clones_into_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("operator-release-v1.21.x");
        let runner = FakeRunner::new().respond(
            "git ls-remote",
            "abc123\trefs/heads/release-v1.21.x\n",
        );

        checkout(&dir).sync(&runner).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(
            runner.command_lines(),
            vec![
                format!("git clone {REMOTE} ."),
                "git reset --hard HEAD --".to_string(),
                "git ls-remote --heads origin release-v1.21.x".to_string(),
                "git checkout origin/release-v1.21.x -B release-v1.21.x".to_string(),
                "git checkout -B actions/update/dockerfile-labels-1.21release-v1.21.x"
                    .to_string(),
            ]
        );
        assert!(runner.calls().iter().all(|call| call.dir == dir));
    }

    #[tokio::test]
    async fn fetches_into_existing_checkout() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".git")).unwrap();
        let runner = FakeRunner::new().respond("git ls-remote", "abc123\trefs/heads/x\n");

        checkout(temp.path()).sync(&runner).await.unwrap();

        let lines = runner.command_lines();
        assert_eq!(lines[0], "git fetch --all");
        assert!(!lines.iter().any(|line| line.starts_with("git clone")));
    }

    #[tokio::test]
    async fn missing_remote_branch_fails_before_checkout() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().respond("git ls-remote", "\n");

        let error = checkout(temp.path()).sync(&runner).await.unwrap_err();

        assert!(matches!(error, SyncError::BranchNotFound { ref branch, .. } if branch == "release-v1.21.x"));
        assert!(!runner
            .command_lines()
            .iter()
            .any(|line| line.starts_with("git checkout")));
    }

    #[tokio::test]
    async fn command_failure_aborts_sync() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().fail("git clone", "fatal: repository not found");

        let error = checkout(temp.path()).sync(&runner).await.unwrap_err();

        assert!(matches!(error, SyncError::Command { step: "clone repository", .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_derived_branch() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new();
        let checkout = WorkingCheckout::new(temp.path(), REMOTE, "main", "bad..name");

        let error = checkout.sync(&runner).await.unwrap_err();

        assert!(matches!(error, SyncError::InvalidBranchName { .. }));
        assert!(runner.calls().is_empty());
    }
}
