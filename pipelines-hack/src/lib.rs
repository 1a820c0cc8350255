#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod apply;
pub mod checkout;
pub mod config;
pub mod dockerfile;
pub mod generate;
pub mod process;
pub mod pull_requests;
pub mod runner;
pub mod summary;
pub mod templates;

pub use apply::{apply_manifests, ApplyError, ApplyOptions, DEFAULT_KONFLUX_DIR};
pub use checkout::{SyncError, WorkingCheckout};
pub use config::{
    project_names, BranchDescriptor, ConfigError, GenerateConfig, ReleaseConfig,
    RepositoryDescriptor, DEFAULT_ORG,
};
pub use dockerfile::{
    patch_dockerfile, resolve_latest_digest, update_dockerfile, BaseImageUpdate, BaseImageWatch,
    CpeLabel, DigestError, PatchError, PatchOutcome,
};
pub use generate::{Application, GenerateError, ManifestGenerator};
pub use process::{CommandError, CommandRunner, ProcessRunner};
pub use pull_requests::{publish, CommitIdentity, PublishError, PublishStatus, PullRequestIntent};
pub use runner::{
    ensure_tool_available, prepare_work_dir, Runner, RunnerConfig, RunnerError, DEFAULT_VERSION,
    DEFAULT_WORK_DIR,
};
pub use summary::{BranchOutcome, RunSummary};
pub use templates::{
    create_handlebars_registry, generate_branch_name, generate_pr_title, TemplateError,
    TemplateRenderer,
};
