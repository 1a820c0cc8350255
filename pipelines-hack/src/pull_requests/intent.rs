//! What a label-update pull request looks like.

use crate::templates::{generate_branch_name, generate_pr_title, TemplateError, TemplateRenderer};
use serde_json::json;

/// Labels attached to every bot PR.
pub const PR_LABELS: [&str; 2] = ["hack", "automated"];

/// Files staged for commit, as a git pathspec.
pub const DOCKERFILE_PATHSPEC: &str = ".konflux/dockerfiles/*.Dockerfile";

/// Committer identity configured in each checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: "openshift-pipelines-bot".to_string(),
            email: "pipelines-extcomm@redhat.com".to_string(),
        }
    }
}

/// A pull request derived from a release name and target branch.
///
/// The same inputs always yield the same head branch and title, so repeated
/// runs land on the same PR.
#[derive(Debug, Clone)]
pub struct PullRequestIntent {
    /// Target branch.
    pub base: String,
    /// Derived branch the changes are pushed to.
    pub head: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub commit_message: String,
}

impl PullRequestIntent {
    /// Builds the intent for installing `label` on `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or commit message template fails to render.
    pub fn for_label_update(
        renderer: &TemplateRenderer,
        config_name: &str,
        branch: &str,
        label: &str,
    ) -> Result<Self, TemplateError> {
        let data = json!({ "branch": branch, "label": label });

        Ok(Self {
            base: branch.to_string(),
            head: generate_branch_name(config_name, branch),
            title: generate_pr_title(config_name, branch),
            body: renderer.render("pr-body.md", &data)?.trim_end().to_string(),
            labels: PR_LABELS.iter().map(|l| (*l).to_string()).collect(),
            commit_message: renderer
                .render("commit-message.txt", &data)?
                .trim_end()
                .to_string(),
        })
    }
}
