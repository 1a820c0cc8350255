//! CLI for the OpenShift Pipelines hack tooling.
//!
//! Generates Konflux, GitHub and Tekton manifests for a repository, applies
//! the Konflux manifests to a cluster, and propagates the CPE Dockerfile
//! label to every release branch as pull requests.

use clap::{Parser, Subcommand};
use pipelines_hack::{
    apply_manifests, ensure_tool_available, prepare_work_dir, project_names, ApplyOptions,
    BaseImageWatch, GenerateConfig, ManifestGenerator, ProcessRunner, RunSummary, Runner,
    RunnerConfig, RunnerError, TemplateRenderer, DEFAULT_KONFLUX_DIR, DEFAULT_ORG,
    DEFAULT_VERSION, DEFAULT_WORK_DIR,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// OpenShift Pipelines hack - manifest generation and Dockerfile label updates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply generated Konflux manifests with kubectl.
    Apply {
        /// Comma-separated versions to apply, e.g. `1-22,0-2`. All when omitted.
        #[arg(long)]
        versions: Option<String>,

        /// Validate client-side without changing the cluster.
        #[arg(long)]
        dry_run: bool,

        /// Directory holding one manifest directory per version.
        #[arg(long, default_value = DEFAULT_KONFLUX_DIR)]
        konflux_dir: PathBuf,
    },

    /// Generate Konflux, GitHub and Tekton manifests for a repository.
    Generate {
        /// Repository configuration file.
        #[arg(long, default_value = "config/konflux/repository.yaml")]
        config: PathBuf,

        /// Directory the manifest tree is written to.
        #[arg(long, default_value = ".")]
        target: PathBuf,
    },

    /// Add the CPE label to Dockerfiles and open PRs for every release branch.
    UpdateLabels {
        /// Product version stamped into the label.
        #[arg(long, default_value = DEFAULT_VERSION)]
        version: String,

        /// Patch files without committing or opening PRs.
        #[arg(long)]
        dry_run: bool,

        /// Work directory for checkouts; empty creates a temporary directory.
        #[arg(long, default_value = DEFAULT_WORK_DIR)]
        dir: String,

        /// GitHub organisation owning the repositories.
        #[arg(long, env = "GITHUB_ORG", default_value = DEFAULT_ORG)]
        org: String,

        /// Leave base image digests untouched.
        #[arg(long)]
        skip_base_image: bool,

        /// Release configuration files.
        #[arg(required = true)]
        configs: Vec<PathBuf>,
    },

    /// Print the file stems of the given files as a JSON array.
    Matrix {
        /// Configuration files.
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current command");
            on_interrupt.cancel();
        }
    });

    match run(args.command, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with compact output and `RUST_LOG` filtering, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Dispatches a subcommand.
async fn run(command: Command, cancel: CancellationToken) -> Result<(), RunnerError> {
    let commands = ProcessRunner::new(cancel);

    match command {
        Command::Apply {
            versions,
            dry_run,
            konflux_dir,
        } => {
            let options = ApplyOptions {
                konflux_dir,
                versions: versions
                    .as_deref()
                    .map(ApplyOptions::parse_versions)
                    .unwrap_or_default(),
                dry_run,
            };
            let applied = apply_manifests(&commands, &options).await?;
            info!(count = applied.len(), "Applied manifest directories");
        }
        Command::Generate { config, target } => {
            let config = GenerateConfig::load(&config)?;
            let renderer = TemplateRenderer::new()?;
            let written = ManifestGenerator::new(&renderer, target).generate(&config)?;
            info!(count = written.len(), "Generated manifests");
        }
        Command::UpdateLabels {
            version,
            dry_run,
            dir,
            org,
            skip_base_image,
            configs,
        } => {
            if !dry_run {
                ensure_tool_available("gh")?;
            }

            let work_dir = prepare_work_dir(Path::new(&dir))?;
            let base_image = (!skip_base_image).then(BaseImageWatch::default);
            let config = RunnerConfig::new(configs, version, dry_run, work_dir)
                .with_org(org)
                .with_base_image(base_image);

            let runner = Runner::new(config, Arc::new(commands))?;
            let summary = runner.run().await?;
            print_summary(&summary);
            if summary.has_failures() {
                warn!(
                    failed = summary.dockerfiles_failed,
                    "Some Dockerfiles could not be patched"
                );
            }
        }
        Command::Matrix { files } => {
            let names = project_names(&files);
            println!("{}", serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string()));
        }
    }

    Ok(())
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Repositories processed: {}", summary.repositories);
    println!("  Branches processed: {}", summary.branches_processed);
    println!("  Branches skipped: {}", summary.branches_skipped);
    println!("  Dockerfiles updated: {}", summary.dockerfiles_updated);
    println!("  Dockerfiles unchanged: {}", summary.dockerfiles_unchanged);
    println!("  Dockerfiles failed: {}", summary.dockerfiles_failed);

    if !summary.dry_run {
        println!("  PRs created: {}", summary.prs_created);
        println!("  PRs updated: {}", summary.prs_updated);
        println!("  Branches with nothing to publish: {}", summary.prs_unchanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Args::try_parse_from(std::iter::once("hack").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn update_labels_accepts_empty_work_dir() {
        let command = parse(&["update-labels", "--dir", "", "config/1.21.yaml"]);

        assert!(matches!(
            command,
            Command::UpdateLabels { ref dir, ref configs, .. }
                if dir.is_empty() && configs == &[PathBuf::from("config/1.21.yaml")]
        ));
    }

    #[test]
    fn update_labels_defaults() {
        let command = parse(&["update-labels", "config/1.21.yaml"]);

        assert!(matches!(
            command,
            Command::UpdateLabels { ref version, ref dir, dry_run: false, skip_base_image: false, .. }
                if version == DEFAULT_VERSION && dir == DEFAULT_WORK_DIR
        ));
    }

    #[test]
    fn update_labels_requires_a_config() {
        assert!(Args::try_parse_from(["hack", "update-labels"]).is_err());
    }

    #[test]
    fn apply_takes_a_version_list() {
        let command = parse(&["apply", "--versions", "1-22,0-2", "--dry-run"]);

        assert!(matches!(
            command,
            Command::Apply { versions: Some(ref v), dry_run: true, .. } if v == "1-22,0-2"
        ));
    }
}
