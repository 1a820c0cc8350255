//! Manifest tree generation.
//!
//! For the `main` branch and every configured release branch this writes:
//! ```text
//! <target>/
//! ├── .konflux/<branch>/
//! │   ├── application.yaml
//! │   ├── tests.yaml
//! │   ├── component-<c>.yaml
//! │   ├── image-<c>.yaml
//! │   └── release-plan.yaml          (release-plan: true)
//! ├── .github/workflows/
//! │   ├── update-sources.<branch>.yaml  (upstream set)
//! │   └── auto-merge.<branch>.yaml
//! └── .tekton/                        (main only)
//!     ├── docker-build.yaml           (kept if present)
//!     ├── <repo>-<version>-<c>-pull-request.yaml
//!     └── <repo>-<version>-<c>-push.yaml
//! ```

mod data;
mod error;

pub use data::{
    Application, ComponentData, DEFAULT_EVENT_TYPE, DEFAULT_PLATFORM, DEFAULT_WATCHED_SOURCES,
};
pub use error::GenerateError;

use crate::config::GenerateConfig;
use crate::templates::helpers::{basename, hyphenize};
use crate::templates::TemplateRenderer;
use std::path::PathBuf;
use tracing::{debug, info};

/// Writes manifest trees under a target directory.
pub struct ManifestGenerator<'a> {
    renderer: &'a TemplateRenderer,
    target: PathBuf,
}

impl<'a> ManifestGenerator<'a> {
    /// Creates a generator writing below `target`.
    pub fn new(renderer: &'a TemplateRenderer, target: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            target: target.into(),
        }
    }

    /// Generates every manifest for `config` and returns the written paths in order.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] on the first template or I/O failure.
    pub fn generate(&self, config: &GenerateConfig) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::new();

        info!("Generate configurations for main branch");
        let main = Application::main(config);
        written.extend(self.generate_konflux(&main)?);
        written.extend(self.generate_github(&main)?);
        written.extend(self.generate_tekton(main)?);

        for branch in &config.branches {
            let Some(app) = Application::for_branch(config, branch) else {
                continue;
            };
            info!(branch = %app.branch, "Generate configurations for branch");
            written.extend(self.generate_konflux(&app)?);
            written.extend(self.generate_github(&app)?);
        }

        Ok(written)
    }

    /// Writes the Konflux application, test, component and image manifests.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a template fails to render or write.
    pub fn generate_konflux(&self, app: &Application) -> Result<Vec<PathBuf>, GenerateError> {
        let dir = self.target.join(".konflux").join(&app.branch);
        info!(dir = %dir.display(), "Generate konflux manifests");

        let mut written = vec![
            self.write("application.yaml", app, dir.join("application.yaml"))?,
            self.write("tests.yaml", app, dir.join("tests.yaml"))?,
        ];
        for component in &app.components {
            written.push(self.write(
                "component.yaml",
                component,
                dir.join(format!("component-{}.yaml", component.name)),
            )?);
            written.push(self.write(
                "image.yaml",
                component,
                dir.join(format!("image-{}.yaml", component.name)),
            )?);
        }
        if app.release_plan {
            written.push(self.write("release-plan.yaml", app, dir.join("release-plan.yaml"))?);
        }

        Ok(written)
    }

    /// Writes the source update and auto-merge workflows.
    ///
    /// Nothing is written for repositories without an upstream.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a template fails to render or write.
    pub fn generate_github(&self, app: &Application) -> Result<Vec<PathBuf>, GenerateError> {
        if app.upstream.is_empty() {
            debug!(branch = %app.branch, "No upstream, skipping GitHub workflows");
            return Ok(Vec::new());
        }

        let dir = self.target.join(".github").join("workflows");
        info!(dir = %dir.display(), "Generate github manifests");

        Ok(vec![
            self.write(
                "update-sources.yaml",
                app,
                dir.join(format!("update-sources.{}.yaml", app.branch)),
            )?,
            self.write(
                "auto-merge.yaml",
                app,
                dir.join(format!("auto-merge.{}.yaml", app.branch)),
            )?,
        ])
    }

    /// Writes the shared build pipeline and per-component pipeline runs.
    ///
    /// An existing `docker-build.yaml` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the directory cannot be created or a
    /// template fails to render or write.
    pub fn generate_tekton(&self, app: Application) -> Result<Vec<PathBuf>, GenerateError> {
        let dir = self.target.join(".tekton");
        info!(dir = %dir.display(), "Generate tekton manifests");
        std::fs::create_dir_all(&dir).map_err(|source| GenerateError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut written = Vec::new();
        let pipeline = dir.join("docker-build.yaml");
        if pipeline.exists() {
            debug!(path = %pipeline.display(), "Keeping existing pipeline");
        } else {
            written.push(self.write("docker-build.yaml", &app, pipeline)?);
        }

        let app = app.with_tekton_defaults();
        let prefix = format!(
            "{}-{}",
            hyphenize(&basename(&app.repository)),
            hyphenize(&app.version)
        );
        for component in &app.components {
            written.push(self.write(
                "component-pull-request.yaml",
                component,
                dir.join(format!("{prefix}-{}-pull-request.yaml", component.name)),
            )?);
            written.push(self.write(
                "component-push.yaml",
                component,
                dir.join(format!("{prefix}-{}-push.yaml", component.name)),
            )?);
        }

        Ok(written)
    }

    fn write<T: serde::Serialize>(
        &self,
        template: &str,
        data: &T,
        path: PathBuf,
    ) -> Result<PathBuf, GenerateError> {
        self.renderer.render_to_file(template, data, &path)?;
        Ok(path)
    }
}
