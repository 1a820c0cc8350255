//! Data objects handed to the manifest templates.
//!
//! Every field is always serialized so strict-mode templates can test any
//! of them without tripping over a missing key.

use crate::config::{ComponentSpec, GenerateBranch, GenerateConfig, GitHub, Patch, Tekton};
use serde::Serialize;

/// Platform built when neither the component, branch nor repository names one.
pub const DEFAULT_PLATFORM: &str = "linux/x86_64";

/// Paths whose changes trigger a build when the repository does not say otherwise.
pub const DEFAULT_WATCHED_SOURCES: &str = r#""upstream/***".pathChanged() || "openshift/patches/***".pathChanged() || "openshift/rpms/***".pathChanged()"#;

/// Event the push pipeline reacts to by default.
pub const DEFAULT_EVENT_TYPE: &str = "push";

/// One repository on one branch.
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub name: String,
    /// `<org>/<repository>`.
    pub repository: String,
    /// Upstream git URL, empty when there is none.
    pub upstream: String,
    pub branch: String,
    pub upstream_branch: String,
    pub version: String,
    pub components: Vec<ComponentData>,
    pub github: GitHub,
    pub tekton: Tekton,
    pub patches: Vec<Patch>,
    pub platforms: Vec<String>,
    pub release_plan: bool,
}

/// One component of an [`Application`].
#[derive(Debug, Clone, Serialize)]
pub struct ComponentData {
    pub name: String,
    pub application: String,
    pub repository: String,
    pub branch: String,
    pub version: String,
    pub tekton: Tekton,
    pub platforms: Vec<String>,
    pub nudges: Vec<String>,
    pub dockerfile: String,
    pub image_prefix: String,
    pub image_suffix: String,
    pub prefetch_input: String,
}

impl Application {
    /// Builds the application for the `main` branch.
    ///
    /// Only `main` carries the repository's GitHub and Tekton settings.
    #[must_use]
    pub fn main(config: &GenerateConfig) -> Self {
        Self::build(
            config,
            "main".to_string(),
            "main".to_string(),
            "main".to_string(),
            config.github.clone(),
            config.tekton.clone(),
            &config.patches,
            &config.platforms,
        )
    }

    /// Builds the application for a configured release branch.
    ///
    /// Returns `None` if the branch has neither a name nor a version.
    #[must_use]
    pub fn for_branch(config: &GenerateConfig, branch: &GenerateBranch) -> Option<Self> {
        let name = branch.branch_name()?;
        let version = branch.version()?;
        let patches = if branch.patches.is_empty() {
            &config.patches
        } else {
            &branch.patches
        };
        let platforms = if branch.platforms.is_empty() {
            &config.platforms
        } else {
            &branch.platforms
        };

        Some(Self::build(
            config,
            name,
            branch.upstream.clone().unwrap_or_else(|| "main".to_string()),
            version,
            GitHub::default(),
            Tekton::default(),
            patches,
            platforms,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        config: &GenerateConfig,
        branch: String,
        upstream_branch: String,
        version: String,
        github: GitHub,
        tekton: Tekton,
        patches: &[Patch],
        platforms: &[String],
    ) -> Self {
        let repository = format!("{}/{}", config.org, config.repository);
        let platforms = if platforms.is_empty() {
            vec![DEFAULT_PLATFORM.to_string()]
        } else {
            platforms.to_vec()
        };

        let components = config
            .components
            .iter()
            .map(|spec| {
                let detailed = match spec {
                    ComponentSpec::Detailed(c) => Some(c),
                    ComponentSpec::Name(_) => None,
                };
                ComponentData {
                    name: spec.name().to_string(),
                    application: config.repository.clone(),
                    repository: repository.clone(),
                    branch: branch.clone(),
                    version: version.clone(),
                    tekton: tekton.clone(),
                    platforms: detailed
                        .filter(|c| !c.platforms.is_empty())
                        .map_or_else(|| platforms.clone(), |c| c.platforms.clone()),
                    nudges: detailed.map(|c| c.nudges.clone()).unwrap_or_default(),
                    dockerfile: detailed
                        .and_then(|c| c.dockerfile.clone())
                        .unwrap_or_else(|| {
                            format!(".konflux/dockerfiles/{}.Dockerfile", spec.name())
                        }),
                    image_prefix: detailed.map(|c| c.image_prefix.clone()).unwrap_or_default(),
                    image_suffix: detailed.map(|c| c.image_suffix.clone()).unwrap_or_default(),
                    prefetch_input: detailed
                        .map(|c| c.prefetch_input.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        Self {
            name: config.repository.clone(),
            repository,
            upstream: config.upstream.clone().unwrap_or_default(),
            branch,
            upstream_branch,
            version,
            components,
            github,
            tekton,
            patches: patches
                .iter()
                .map(|patch| Patch {
                    name: patch.name.clone(),
                    script: patch.script.trim_end().to_string(),
                })
                .collect(),
            platforms,
            release_plan: config.release_plan,
        }
    }

    /// Fills in the Tekton defaults used by the pipeline-run templates.
    pub(crate) fn with_tekton_defaults(mut self) -> Self {
        if self.tekton.watched_sources.is_empty() {
            self.tekton.watched_sources = DEFAULT_WATCHED_SOURCES.to_string();
        }
        if self.tekton.event_type.is_empty() {
            self.tekton.event_type = DEFAULT_EVENT_TYPE.to_string();
        }
        for component in &mut self.components {
            component.tekton = self.tekton.clone();
        }
        self
    }
}
