//! Configuration loading.
//!
//! Two YAML shapes are read: [`GenerateConfig`] describes one repository for
//! manifest generation, and [`ReleaseConfig`] lists the repositories whose
//! Dockerfiles the label updater visits.

mod error;
mod generate;
mod release;

pub use error::ConfigError;
pub use generate::{
    ComponentConfig, ComponentSpec, GenerateBranch, GenerateConfig, GitHub, Patch, Tekton,
    DEFAULT_ORG,
};
pub use release::{BranchDescriptor, ReleaseConfig, RepositoryDescriptor};

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Reads and deserializes a YAML file.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    debug!(path = %path.display(), "Reading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Returns the file stem of every path, in order.
///
/// Used to turn a list of configuration files into a CI job matrix.
#[must_use]
pub fn project_names<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .map(|path| {
            path.as_ref()
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names_strip_directories_and_extensions() {
        let names = project_names(&["config/konflux/operator.yaml", "pipelines-as-code.yaml", "plain"]);
        assert_eq!(names, vec!["operator", "pipelines-as-code", "plain"]);
    }

    #[test]
    fn read_yaml_reports_parse_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        std::fs::write(&path, "name: [unterminated").unwrap();

        let result: Result<RepositoryDescriptor, _> = read_yaml(&path);

        assert!(matches!(result, Err(ConfigError::YamlError { .. })));
    }
}
