//! Applying generated Konflux manifests to a cluster.

mod error;

pub use error::ApplyError;

use crate::process::CommandRunner;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default root holding one manifest directory per version.
pub const DEFAULT_KONFLUX_DIR: &str = ".konflux";

/// What to apply and how.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Root directory containing one subdirectory per version.
    pub konflux_dir: PathBuf,
    /// Versions to apply; every subdirectory when empty.
    pub versions: Vec<String>,
    /// Validate client-side only.
    pub dry_run: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            konflux_dir: PathBuf::from(DEFAULT_KONFLUX_DIR),
            versions: Vec::new(),
            dry_run: false,
        }
    }
}

impl ApplyOptions {
    /// Parses a comma-separated version list such as `1-22,0-2`.
    ///
    /// Entries are trimmed and empty entries dropped.
    #[must_use]
    pub fn parse_versions(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Applies each selected version directory with `kubectl apply -R -f`.
///
/// Returns the applied directories in order.
///
/// # Errors
///
/// Returns [`ApplyError::MissingDirectory`] for a requested version without a
/// directory, [`ApplyError::Io`] if the root cannot be listed, and
/// [`ApplyError::Command`] if `kubectl` fails.
pub async fn apply_manifests(
    runner: &dyn CommandRunner,
    options: &ApplyOptions,
) -> Result<Vec<PathBuf>, ApplyError> {
    let dirs = if options.versions.is_empty() {
        version_dirs(&options.konflux_dir)?
    } else {
        options
            .versions
            .iter()
            .map(|version| {
                let dir = options.konflux_dir.join(version);
                if dir.is_dir() {
                    Ok(dir)
                } else {
                    Err(ApplyError::MissingDirectory {
                        path: dir.display().to_string(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    for dir in &dirs {
        info!(dir = %dir.display(), "Applying manifests");
        let target = dir.display().to_string();
        let mut args = vec!["apply"];
        if options.dry_run {
            args.push("--dry-run=client");
        }
        args.extend(["-R", "-f", target.as_str()]);

        let output = runner.run(Path::new("."), "kubectl", &args).await?;
        print!("{output}");
    }

    info!(count = dirs.len(), "Done applying Konflux manifests");
    Ok(dirs)
}

/// Lists the subdirectories of `root`, sorted.
fn version_dirs(root: &Path) -> Result<Vec<PathBuf>, ApplyError> {
    let io_error = |source| ApplyError::Io {
        path: root.display().to_string(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;
    use tempfile::TempDir;

    fn konflux_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        for version in ["main", "1-21", "0-2"] {
            std::fs::create_dir_all(temp.path().join(version)).unwrap();
        }
        std::fs::write(temp.path().join("README.md"), "not a version").unwrap();
        temp
    }

    #[test]
    fn parses_version_lists() {
        assert_eq!(ApplyOptions::parse_versions(" 1-22, ,0-2,"), vec!["1-22", "0-2"]);
        assert!(ApplyOptions::parse_versions("").is_empty());
    }

    #[tokio::test]
    async fn applies_every_version_in_order() {
        let temp = konflux_tree();
        let runner = FakeRunner::new();
        let options = ApplyOptions {
            konflux_dir: temp.path().to_path_buf(),
            ..Default::default()
        };

        let applied = apply_manifests(&runner, &options).await.unwrap();

        let names: Vec<_> = applied
            .iter()
            .map(|dir| dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["0-2", "1-21", "main"]);
        assert_eq!(
            runner.command_lines()[0],
            format!("kubectl apply -R -f {}", temp.path().join("0-2").display())
        );
    }

    #[tokio::test]
    async fn dry_run_uses_client_validation() {
        let temp = konflux_tree();
        let runner = FakeRunner::new();
        let options = ApplyOptions {
            konflux_dir: temp.path().to_path_buf(),
            versions: vec!["1-21".to_string()],
            dry_run: true,
        };

        apply_manifests(&runner, &options).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![format!(
                "kubectl apply --dry-run=client -R -f {}",
                temp.path().join("1-21").display()
            )]
        );
    }

    #[tokio::test]
    async fn missing_version_applies_nothing() {
        let temp = konflux_tree();
        let runner = FakeRunner::new();
        let options = ApplyOptions {
            konflux_dir: temp.path().to_path_buf(),
            versions: vec!["1-21".to_string(), "9-9".to_string()],
            dry_run: false,
        };

        let error = apply_manifests(&runner, &options).await.unwrap_err();

        assert!(matches!(error, ApplyError::MissingDirectory { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn kubectl_failure_stops() {
        let temp = konflux_tree();
        let runner = FakeRunner::new().fail("kubectl", "error: the server doesn't have a resource type");
        let options = ApplyOptions {
            konflux_dir: temp.path().to_path_buf(),
            ..Default::default()
        };

        let error = apply_manifests(&runner, &options).await.unwrap_err();

        assert!(matches!(error, ApplyError::Command(_)));
        assert_eq!(runner.calls().len(), 1);
    }
}
