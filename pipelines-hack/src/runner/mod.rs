//! Orchestrates Dockerfile label updates across release configurations.
//!
//! For each release configuration, each repository it lists and each of the
//! repository's branches, the runner syncs a working checkout, patches every
//! `.konflux/dockerfiles/*.Dockerfile`, and publishes the result as a PR.
//! The first sync or publish failure aborts the whole batch.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_VERSION, DEFAULT_WORK_DIR};
pub use error::RunnerError;

use crate::checkout::WorkingCheckout;
use crate::config::{BranchDescriptor, ReleaseConfig, RepositoryDescriptor};
use crate::dockerfile::{
    resolve_latest_digest, update_dockerfile, BaseImageUpdate, CpeLabel, PatchOutcome,
};
use crate::process::CommandRunner;
use crate::pull_requests::{publish, PullRequestIntent};
use crate::summary::{BranchOutcome, RunSummary};
use crate::templates::{generate_branch_name, TemplateRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Orchestrates a full label update run.
pub struct Runner {
    config: RunnerConfig,
    commands: Arc<dyn CommandRunner>,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to register.
    pub fn new(config: RunnerConfig, commands: Arc<dyn CommandRunner>) -> Result<Self, RunnerError> {
        Ok(Self {
            config,
            commands,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Executes the full update flow.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, sync, template or publish error.
    /// Individual Dockerfiles that fail to patch are logged and counted
    /// instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let label = self.config.label();
        info!(version = self.config.version(), %label, "Updating Dockerfiles with CPE label");

        let digest = self.resolve_digest().await;
        let base = match (self.config.base_image(), digest.as_deref()) {
            (Some(watch), Some(digest)) => Some(BaseImageUpdate { watch, digest }),
            _ => None,
        };

        for path in self.config.config_files() {
            let release = ReleaseConfig::load(path)?;
            println!("Processing repositories for {}", release.name);

            for repo in &release.repositories {
                summary.repositories += 1;
                let remote_url = repo.remote_url(self.config.org());
                println!("::group:: Processing repository {remote_url}");

                for branch in &repo.branches {
                    let span = info_span!("branch", repo = %repo.name, branch = %branch.name);
                    let outcome = self
                        .process_branch(&release, repo, branch, &label, base)
                        .instrument(span)
                        .await?;
                    summary.record(&outcome);
                }

                println!("::endgroup::");
            }
        }

        Ok(summary)
    }

    /// Looks up the watched base image digest once per run.
    async fn resolve_digest(&self) -> Option<String> {
        let watch = self.config.base_image()?;
        match resolve_latest_digest(self.commands.as_ref(), &watch.reference).await {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!(error = %e, "Skipping base image update");
                None
            }
        }
    }

    async fn process_branch(
        &self,
        release: &ReleaseConfig,
        repo: &RepositoryDescriptor,
        branch: &BranchDescriptor,
        label: &CpeLabel,
        base: Option<BaseImageUpdate<'_>>,
    ) -> Result<BranchOutcome, RunnerError> {
        let dir = self
            .config
            .work_dir()
            .join(format!("{}-{}", repo.name, branch.name));
        info!(dir = %dir.display(), "Processing branch");

        let checkout = WorkingCheckout::new(
            &dir,
            repo.remote_url(self.config.org()),
            &branch.name,
            generate_branch_name(&release.name, &branch.name),
        );
        checkout.sync(self.commands.as_ref()).await?;

        let dockerfiles_dir = dir.join(".konflux").join("dockerfiles");
        if !dockerfiles_dir.is_dir() {
            info!("No .konflux/dockerfiles directory found, skipping");
            return Ok(skipped(repo, branch, "no .konflux/dockerfiles directory"));
        }

        let (mut updated, mut unchanged, mut failed) = (0, 0, 0);
        for dockerfile in list_dockerfiles(&dockerfiles_dir)? {
            info!(path = %dockerfile.display(), "Updating");
            match update_dockerfile(&dockerfile, label, base) {
                Ok(PatchOutcome::Updated) => updated += 1,
                Ok(PatchOutcome::Unchanged) => unchanged += 1,
                Err(e) => {
                    warn!(path = %dockerfile.display(), error = %e, "Failed to update Dockerfile");
                    failed += 1;
                }
            }
        }

        if updated + unchanged == 0 {
            info!("No Dockerfiles updated");
            return Ok(skipped(repo, branch, "no Dockerfiles updated"));
        }

        let publish = if self.config.dry_run() {
            info!(updated, "Dry run, not committing");
            None
        } else {
            let intent = PullRequestIntent::for_label_update(
                &self.renderer,
                &release.name,
                &branch.name,
                label.text(),
            )?;
            let status = publish(
                self.commands.as_ref(),
                checkout.dir(),
                &intent,
                self.config.identity(),
            )
            .await?;
            info!(status = status.as_str(), "Published");
            Some(status)
        };

        Ok(BranchOutcome::Patched {
            repository: repo.name.clone(),
            branch: branch.name.clone(),
            updated,
            unchanged,
            failed,
            publish,
        })
    }
}

/// Fails unless `tool` can be found on `PATH`.
///
/// # Errors
///
/// Returns [`RunnerError::ToolNotFound`] if the executable is missing.
pub fn ensure_tool_available(tool: &str) -> Result<PathBuf, RunnerError> {
    which::which(tool).map_err(|source| RunnerError::ToolNotFound {
        tool: tool.to_string(),
        source,
    })
}

/// Resolves the work directory, creating a fresh temporary one when `dir` is empty.
///
/// # Errors
///
/// Returns [`RunnerError::Io`] if the temporary directory cannot be created.
pub fn prepare_work_dir(dir: &Path) -> Result<PathBuf, RunnerError> {
    if !dir.as_os_str().is_empty() {
        return Ok(dir.to_path_buf());
    }

    let temp = tempfile::Builder::new()
        .prefix("update-dockerfile-labels")
        .tempdir()
        .map_err(|source| RunnerError::Io {
            path: std::env::temp_dir().display().to_string(),
            source,
        })?;
    Ok(temp.keep())
}

/// Lists `*.Dockerfile` entries of `dir`, sorted by path.
fn list_dockerfiles(dir: &Path) -> Result<Vec<PathBuf>, RunnerError> {
    let io_error = |source| RunnerError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "Dockerfile") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn skipped(repo: &RepositoryDescriptor, branch: &BranchDescriptor, reason: &str) -> BranchOutcome {
    BranchOutcome::Skipped {
        repository: repo.name.clone(),
        branch: branch.name.clone(),
        reason: reason.to_string(),
    }
}
