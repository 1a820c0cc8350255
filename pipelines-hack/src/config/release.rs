//! Release configuration consumed by the label updater.

use super::{read_yaml, ConfigError};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A release configuration listing the repositories it covers.
///
/// Each entry of `resources` names a descriptor at `repos/<name>.yaml` next
/// to the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseConfig {
    /// Release identity, used in derived branch names and PR titles.
    pub name: String,

    #[serde(default)]
    pub resources: Vec<String>,

    /// Descriptors resolved from `resources`, in order.
    #[serde(skip)]
    pub repositories: Vec<RepositoryDescriptor>,
}

/// A repository and the branches to process in it.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,

    #[serde(default)]
    pub upstream: Option<String>,

    #[serde(default)]
    pub branches: Vec<BranchDescriptor>,

    #[serde(default)]
    pub components: Vec<String>,
}

/// A downstream branch of a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchDescriptor {
    pub name: String,

    /// Upstream branch this one tracks.
    #[serde(default)]
    pub upstream: Option<String>,
}

impl RepositoryDescriptor {
    /// Returns the clone URL of the repository within `org`.
    #[must_use]
    pub fn remote_url(&self, org: &str) -> String {
        format!("https://github.com/{org}/{}.git", self.name)
    }
}

impl ReleaseConfig {
    /// Reads a release configuration and every repository descriptor it references.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration or any referenced
    /// descriptor is missing, is not valid YAML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = read_yaml(path)?;

        if config.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: "name must not be empty".to_string(),
            });
        }

        let repos_dir = path.parent().unwrap_or(Path::new(".")).join("repos");
        for resource in &config.resources {
            let descriptor_path = repos_dir.join(format!("{resource}.yaml"));
            let descriptor: RepositoryDescriptor = read_yaml(&descriptor_path)?;
            debug!(
                resource,
                branches = descriptor.branches.len(),
                "Loaded repository descriptor"
            );
            config.repositories.push(descriptor);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_release(dir: &Path) -> std::path::PathBuf {
        fs::create_dir_all(dir.join("repos")).unwrap();
        fs::write(
            dir.join("repos/operator.yaml"),
            r#"
name: operator
upstream: https://github.com/tektoncd/operator
components: [operator, proxy]
branches:
  - name: release-v1.21.x
    upstream: release-v0.76.x
  - name: next
platforms: [linux/x86_64]
"#,
        )
        .unwrap();
        let path = dir.join("1.21.yaml");
        fs::write(&path, "name: \"1.21\"\nresources:\n  - operator\n").unwrap();
        path
    }

    #[test]
    fn resolves_repository_descriptors() {
        let temp = TempDir::new().unwrap();
        let path = write_release(temp.path());

        let config = ReleaseConfig::load(&path).unwrap();

        assert_eq!(config.name, "1.21");
        assert_eq!(config.repositories.len(), 1);
        let repo = &config.repositories[0];
        assert_eq!(repo.branches[0].name, "release-v1.21.x");
        assert_eq!(repo.branches[0].upstream.as_deref(), Some("release-v0.76.x"));
        assert_eq!(repo.branches[1].upstream, None);
        assert_eq!(
            repo.remote_url("openshift-pipelines"),
            "https://github.com/openshift-pipelines/operator.git"
        );
    }

    #[test]
    fn missing_descriptor_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("1.21.yaml");
        fs::write(&path, "name: \"1.21\"\nresources: [absent]\n").unwrap();

        let error = ReleaseConfig::load(&path).unwrap_err();

        assert!(matches!(error, ConfigError::MissingFile { ref path } if path.ends_with("repos/absent.yaml")));
    }

    #[test]
    fn rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "name: \"\"\n").unwrap();

        assert!(matches!(
            ReleaseConfig::load(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
