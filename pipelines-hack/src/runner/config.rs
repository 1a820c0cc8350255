//! Runner configuration.

use crate::config::DEFAULT_ORG;
use crate::dockerfile::{BaseImageWatch, CpeLabel};
use crate::pull_requests::CommitIdentity;
use std::path::{Path, PathBuf};

/// Version stamped into the CPE label unless overridden.
pub const DEFAULT_VERSION: &str = "1.21";

/// Directory checkouts are kept in between runs.
pub const DEFAULT_WORK_DIR: &str = "/tmp/dockerfile-labels";

/// Configuration for a label update run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Release configuration files to process, in order.
    config_files: Vec<PathBuf>,
    /// Product version for the CPE label.
    version: String,
    /// Whether to patch files without committing or opening PRs.
    dry_run: bool,
    /// Directory holding one checkout per repository and branch.
    work_dir: PathBuf,
    /// GitHub organisation owning the repositories.
    org: String,
    /// Base image to repin; `None` disables digest updates.
    base_image: Option<BaseImageWatch>,
    /// Committer identity used in each checkout.
    identity: CommitIdentity,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_files: Vec<PathBuf>, version: String, dry_run: bool, work_dir: PathBuf) -> Self {
        Self {
            config_files,
            version,
            dry_run,
            work_dir,
            org: DEFAULT_ORG.to_string(),
            base_image: Some(BaseImageWatch::default()),
            identity: CommitIdentity::default(),
        }
    }

    /// Sets the GitHub organisation.
    pub fn with_org(mut self, org: String) -> Self {
        self.org = org;
        self
    }

    /// Sets the base image to repin, or disables repinning.
    pub fn with_base_image(mut self, base_image: Option<BaseImageWatch>) -> Self {
        self.base_image = base_image;
        self
    }

    /// Returns the release configuration files.
    pub fn config_files(&self) -> &[PathBuf] {
        &self.config_files
    }

    /// Returns the product version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the CPE label for the configured version.
    pub fn label(&self) -> CpeLabel {
        CpeLabel::for_version(&self.version)
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the work directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the GitHub organisation.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Returns the watched base image, if repinning is enabled.
    pub fn base_image(&self) -> Option<&BaseImageWatch> {
        self.base_image.as_ref()
    }

    /// Returns the committer identity.
    pub fn identity(&self) -> &CommitIdentity {
        &self.identity
    }
}
