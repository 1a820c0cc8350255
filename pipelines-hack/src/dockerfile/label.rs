//! Label values installed by the patcher.

use std::fmt;

/// A single `key="value"` label line body, e.g. a CPE annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpeLabel {
    key: String,
    text: String,
}

impl CpeLabel {
    /// Builds the OpenShift Pipelines CPE label for a product version.
    #[must_use]
    pub fn for_version(version: &str) -> Self {
        Self::new(format!(
            "cpe=\"cpe:/a:redhat:openshift_pipelines:{version}::el9\""
        ))
    }

    /// Wraps literal label text; the key is everything before the first `=`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let key = text
            .split('=')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"')
            .to_string();
        Self { key, text }
    }

    /// Returns the label key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the full `key=value` text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CpeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The base-image argument whose digest is kept current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseImageWatch {
    /// Trimmed-line prefix of the watched argument, e.g. `ARG RUNTIME=`.
    pub arg_prefix: String,
    /// Image path the argument must reference.
    pub image: String,
    /// Reference whose latest digest is looked up.
    pub reference: String,
}

impl Default for BaseImageWatch {
    fn default() -> Self {
        Self {
            arg_prefix: "ARG RUNTIME=".to_string(),
            image: "ubi9/ubi-minimal".to_string(),
            reference: "registry.access.redhat.com/ubi9/ubi-minimal:latest".to_string(),
        }
    }
}

impl BaseImageWatch {
    /// Returns true if `line` declares the watched argument.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        line.trim().starts_with(&self.arg_prefix) && line.contains(&self.image)
    }

    /// Replaces the digest suffix of a pinned reference, keeping the
    /// repository and tag untouched. Returns `None` unless the line carries
    /// exactly one `@sha256:` pin.
    #[must_use]
    pub fn rewrite(&self, line: &str, digest: &str) -> Option<String> {
        let mut parts = line.split("@sha256:");
        let prefix = parts.next()?;
        parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(format!("{prefix}@{digest}"))
    }
}

/// A resolved digest for a watched base image.
#[derive(Debug, Clone, Copy)]
pub struct BaseImageUpdate<'a> {
    pub watch: &'a BaseImageWatch,
    /// Full digest including the algorithm, e.g. `sha256:…`.
    pub digest: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cpe_for_version() {
        let label = CpeLabel::for_version("1.21");
        assert_eq!(
            label.text(),
            "cpe=\"cpe:/a:redhat:openshift_pipelines:1.21::el9\""
        );
        assert_eq!(label.key(), "cpe");
    }

    #[test]
    fn rewrites_only_the_digest() {
        let watch = BaseImageWatch::default();
        let line = "ARG RUNTIME=registry.access.redhat.com/ubi9/ubi-minimal:latest@sha256:aaaa";

        assert!(watch.matches(line));
        assert_eq!(
            watch.rewrite(line, "sha256:bbbb").as_deref(),
            Some("ARG RUNTIME=registry.access.redhat.com/ubi9/ubi-minimal:latest@sha256:bbbb")
        );
    }

    #[test]
    fn ignores_unpinned_and_other_arguments() {
        let watch = BaseImageWatch::default();

        assert!(watch
            .rewrite("ARG RUNTIME=registry.access.redhat.com/ubi9/ubi-minimal:latest", "sha256:b")
            .is_none());
        assert!(!watch.matches("ARG GO_BUILDER=registry.access.redhat.com/ubi9/go-toolset@sha256:a"));
    }
}
