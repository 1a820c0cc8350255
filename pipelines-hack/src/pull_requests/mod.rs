//! Committing label updates and opening pull requests.
//!
//! Publishing is idempotent across runs: the derived branch is force-pushed
//! and an existing open PR for it is reused rather than duplicated.

mod error;
mod intent;
mod status;

pub use error::PublishError;
pub use intent::{CommitIdentity, PullRequestIntent, DOCKERFILE_PATHSPEC, PR_LABELS};
pub use status::PublishStatus;

use crate::process::CommandRunner;
use std::path::Path;
use tracing::{debug, info, info_span, Instrument};

/// Commits the patched Dockerfiles in `dir`, pushes the derived branch and
/// makes sure a PR for it exists.
///
/// This function:
/// 1. Returns early if `git status --porcelain` reports a clean tree
/// 2. Configures the committer identity for the checkout
/// 3. Stages [`DOCKERFILE_PATHSPEC`] and commits
/// 4. Force-pushes the derived branch
/// 5. Opens a PR unless one is already open for the branch pair
///
/// # Errors
///
/// Returns [`PublishError::Command`] if any git or gh invocation fails, other
/// than a commit that finds nothing to commit.
pub async fn publish(
    runner: &dyn CommandRunner,
    dir: &Path,
    intent: &PullRequestIntent,
    identity: &CommitIdentity,
) -> Result<PublishStatus, PublishError> {
    let span = info_span!("publish", base = %intent.base, head = %intent.head);

    async {
        let status = run(runner, dir, "git", "check git status", &["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            info!("No changes, skipping commit and PR");
            return Ok(PublishStatus::NoChanges);
        }

        run(
            runner,
            dir,
            "git",
            "set git user name",
            &["config", "user.name", &identity.name],
        )
        .await?;
        run(
            runner,
            dir,
            "git",
            "set git user email",
            &["config", "user.email", &identity.email],
        )
        .await?;
        run(runner, dir, "git", "stage Dockerfiles", &["add", DOCKERFILE_PATHSPEC]).await?;

        match runner
            .run(dir, "git", &["commit", "-m", &intent.commit_message])
            .await
        {
            Ok(_) => {}
            Err(e) if e.output().is_some_and(|out| out.contains("nothing to commit")) => {
                info!("No new changes to commit");
                return Ok(PublishStatus::NothingToCommit);
            }
            Err(source) => {
                return Err(PublishError::Command {
                    step: "commit",
                    dir: dir.display().to_string(),
                    source,
                })
            }
        }

        info!("Pushing changes");
        run(
            runner,
            dir,
            "git",
            "push",
            &["push", "-f", "origin", &intent.head],
        )
        .await?;

        let existing = run(
            runner,
            dir,
            "gh",
            "check for an existing PR",
            &[
                "pr",
                "list",
                "--base",
                &intent.base,
                "--head",
                &intent.head,
                "--json",
                "number,url",
                "--jq",
                ".[0].number",
            ],
        )
        .await?;
        let existing = existing.trim();

        if !existing.is_empty() && existing != "null" {
            info!(pr_number = existing, "PR already exists and was updated by the push");
            return Ok(PublishStatus::Updated {
                number: existing.to_string(),
            });
        }

        info!("Creating new PR");
        let label_args: Vec<String> = intent
            .labels
            .iter()
            .map(|label| format!("--label={label}"))
            .collect();
        let mut args = vec![
            "pr",
            "create",
            "--base",
            intent.base.as_str(),
            "--head",
            intent.head.as_str(),
        ];
        args.extend(label_args.iter().map(String::as_str));
        args.extend([
            "--title",
            intent.title.as_str(),
            "--body",
            intent.body.as_str(),
        ]);

        let output = run(runner, dir, "gh", "create the PR", &args).await?;
        let url = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or_default()
            .to_string();
        debug!(%url, "PR created");

        Ok(PublishStatus::Created { url })
    }
    .instrument(span)
    .await
}

async fn run(
    runner: &dyn CommandRunner,
    dir: &Path,
    program: &str,
    step: &'static str,
    args: &[&str],
) -> Result<String, PublishError> {
    runner
        .run(dir, program, args)
        .await
        .map_err(|source| PublishError::Command {
            step,
            dir: dir.display().to_string(),
            source,
        })
}
