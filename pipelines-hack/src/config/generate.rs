//! Repository configuration consumed by manifest generation.

use super::{read_yaml, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Organisation repositories live under unless configured otherwise.
pub const DEFAULT_ORG: &str = "openshift-pipelines";

/// Parsed `config/konflux/repository.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenerateConfig {
    /// Repository name within the organisation.
    pub repository: String,

    /// Upstream git URL; GitHub workflows are only generated when set.
    #[serde(default)]
    pub upstream: Option<String>,

    #[serde(default = "default_org")]
    pub org: String,

    #[serde(default)]
    pub github: GitHub,

    #[serde(default)]
    pub tekton: Tekton,

    #[serde(default)]
    pub components: Vec<ComponentSpec>,

    #[serde(default)]
    pub branches: Vec<GenerateBranch>,

    #[serde(default)]
    pub patches: Vec<Patch>,

    #[serde(default)]
    pub platforms: Vec<String>,

    /// Also emit a `release-plan.yaml` per branch.
    #[serde(default)]
    pub release_plan: bool,
}

fn default_org() -> String {
    DEFAULT_ORG.to_string()
}

/// GitHub workflow options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"), deny_unknown_fields)]
pub struct GitHub {
    /// Extra workflow steps spliced into `update-sources`.
    #[serde(default)]
    pub update_sources: String,
}

/// Tekton / Pipelines-as-Code options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"), deny_unknown_fields)]
pub struct Tekton {
    /// CEL expression of paths that trigger a build.
    #[serde(default)]
    pub watched_sources: String,

    #[serde(default, alias = "event_type")]
    pub event_type: String,

    #[serde(default, rename(deserialize = "build-nudge-files"))]
    pub nudge_files: String,
}

/// A component, either just its name or a full mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentSpec {
    Name(String),
    Detailed(ComponentConfig),
}

impl ComponentSpec {
    /// Returns the component name.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed(config) => &config.name,
        }
    }
}

/// Per-component overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub image_prefix: String,
    #[serde(default)]
    pub image_suffix: String,
    #[serde(default)]
    pub prefetch_input: String,
    #[serde(default)]
    pub nudges: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// A release branch to generate manifests for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenerateBranch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Upstream branch the sources are synced from.
    #[serde(default)]
    pub upstream: Option<String>,
    #[serde(default)]
    pub patches: Vec<Patch>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl GenerateBranch {
    /// Returns the downstream branch name: `name`, or `release-v{version}.x`.
    pub fn branch_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| self.version.as_ref().map(|v| format!("release-v{v}.x")))
    }

    /// Returns the version used in resource names, falling back to the branch name.
    pub fn version(&self) -> Option<String> {
        self.version.clone().or_else(|| self.name.clone())
    }
}

/// A named script applied to upstream sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patch {
    pub name: String,
    pub script: String,
}

impl GenerateConfig {
    /// Reads and validates a repository configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, is not valid YAML,
    /// carries unknown keys, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = read_yaml(path)?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.repository.trim().is_empty() {
            return Err(invalid("repository must not be empty".to_string()));
        }

        if let Some(upstream) = &self.upstream {
            if Url::parse(upstream).is_err() {
                return Err(invalid(format!("upstream is not a valid URL: {upstream}")));
            }
        }

        for component in &self.components {
            if component.name().trim().is_empty() {
                return Err(invalid("component name must not be empty".to_string()));
            }
        }

        for (index, branch) in self.branches.iter().enumerate() {
            if branch.branch_name().is_none() {
                return Err(invalid(format!(
                    "branch #{} needs a name or a version",
                    index + 1
                )));
            }
        }

        Ok(())
    }
}
