//! Template rendering using Handlebars.
//!
//! Manifest, pull request and commit message templates are embedded at
//! compile time and rendered through a single strict-mode registry.

mod error;
pub mod helpers;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Prefix of every bot-owned branch carrying label updates.
pub const LABELS_BRANCH_PREFIX: &str = "actions/update/dockerfile-labels-";

/// Generates the derived branch for a label update.
///
/// Format: "actions/update/dockerfile-labels-{config_name}{branch}"
#[must_use]
pub fn generate_branch_name(config_name: &str, branch: &str) -> String {
    format!("{LABELS_BRANCH_PREFIX}{config_name}{branch}")
}

/// Generates the PR title for a label update.
///
/// Format: "[bot:{config_name}:{branch}] Update Dockerfile CPE labels and base images"
#[must_use]
pub fn generate_pr_title(config_name: &str, branch: &str) -> String {
    format!("[bot:{config_name}:{branch}] Update Dockerfile CPE labels and base images")
}
