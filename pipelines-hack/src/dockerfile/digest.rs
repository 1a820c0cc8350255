//! Latest-digest lookup for a base image.

use super::error::DigestError;
use crate::process::CommandRunner;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SkopeoInspect {
    #[serde(rename = "Digest")]
    digest: String,
}

/// Resolves the current digest of `reference`.
///
/// Tries `skopeo inspect`, then `docker pull`, then `podman pull`; the first
/// tool that succeeds and reports a digest wins.
///
/// # Errors
///
/// Returns [`DigestError`] if none of the tools produced a digest.
pub async fn resolve_latest_digest(
    runner: &dyn CommandRunner,
    reference: &str,
) -> Result<String, DigestError> {
    let here = Path::new(".");

    let transport = format!("docker://{reference}");
    match runner.run(here, "skopeo", &["inspect", &transport]).await {
        Ok(output) => {
            if let Some(digest) = parse_skopeo(&output) {
                info!(%digest, "Found latest digest via skopeo");
                return Ok(digest);
            }
        }
        Err(e) => debug!(error = %e, "skopeo lookup failed"),
    }

    for tool in ["docker", "podman"] {
        match runner.run(here, tool, &["pull", reference]).await {
            Ok(output) => {
                if let Some(digest) = parse_pull(&output) {
                    info!(%digest, tool, "Found latest digest");
                    return Ok(digest);
                }
            }
            Err(e) => debug!(error = %e, tool, "Pull lookup failed"),
        }
    }

    Err(DigestError {
        reference: reference.to_string(),
    })
}

/// Reads the `Digest` field of the first JSON document in `output`.
fn parse_skopeo(output: &str) -> Option<String> {
    let start = output.find('{')?;
    serde_json::Deserializer::from_str(&output[start..])
        .into_iter::<SkopeoInspect>()
        .next()?
        .ok()
        .map(|inspect| inspect.digest)
}

/// Takes the last field of the first line mentioning `Digest:`.
fn parse_pull(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("Digest:"))
        .and_then(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            (fields.len() >= 2).then(|| fields[fields.len() - 1].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;

    const REFERENCE: &str = "registry.access.redhat.com/ubi9/ubi-minimal:latest";

    #[tokio::test]
    async fn prefers_skopeo() {
        let runner = FakeRunner::new().respond(
            "skopeo inspect",
            "{\"Name\": \"ubi-minimal\", \"Digest\": \"sha256:abc\", \"Layers\": []}\n",
        );

        let digest = resolve_latest_digest(&runner, REFERENCE).await.unwrap();

        assert_eq!(digest, "sha256:abc");
        assert_eq!(
            runner.command_lines(),
            vec![format!("skopeo inspect docker://{REFERENCE}")]
        );
    }

    #[tokio::test]
    async fn falls_back_to_docker_then_podman() {
        let runner = FakeRunner::new()
            .fail("skopeo", "skopeo: command not found")
            .fail("docker", "Cannot connect to the Docker daemon")
            .respond(
                "podman pull",
                "Trying to pull...\nDigest: sha256:fromPodman\nWriting manifest\n",
            );

        let digest = resolve_latest_digest(&runner, REFERENCE).await.unwrap();

        assert_eq!(digest, "sha256:fromPodman");
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn fails_when_no_tool_reports_a_digest() {
        let runner = FakeRunner::new().respond("docker pull", "latest: Pulling from ubi9\n");

        let error = resolve_latest_digest(&runner, REFERENCE).await.unwrap_err();

        assert!(error.to_string().contains(REFERENCE));
    }
}
