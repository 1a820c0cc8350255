//! Dockerfile `LABEL` patching.
//!
//! Files are parsed into typed line records (see [`lines`]) and rebuilt with
//! the CPE label installed into the last label block. The watched base image
//! can be repinned to a freshly resolved digest in the same pass.

mod digest;
mod error;
mod label;
pub mod lines;
mod patch;

pub use digest::resolve_latest_digest;
pub use error::{DigestError, PatchError};
pub use label::{BaseImageUpdate, BaseImageWatch, CpeLabel};
pub use patch::patch_dockerfile;

use std::path::Path;
use tracing::debug;

/// Result of patching a Dockerfile on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file content changed and was rewritten.
    Updated,
    /// The file already carried the label and digest; nothing was written.
    Unchanged,
}

/// Patches the Dockerfile at `path` in place.
///
/// Nothing is written when patching fails or produces identical content.
///
/// # Errors
///
/// Returns [`PatchError`] if the file cannot be read or written, or lacks a
/// label block or `name` key.
pub fn update_dockerfile(
    path: &Path,
    label: &CpeLabel,
    base: Option<BaseImageUpdate<'_>>,
) -> Result<PatchOutcome, PatchError> {
    let io_error = |source| PatchError::Io {
        path: path.display().to_string(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(io_error)?;
    let patched = patch_dockerfile(&content, label, base)?;

    if patched == content {
        debug!(path = %path.display(), "Dockerfile already up to date");
        return Ok(PatchOutcome::Unchanged);
    }

    std::fs::write(path, patched).map_err(io_error)?;
    Ok(PatchOutcome::Updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_patched_file_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("operator.Dockerfile");
        std::fs::write(&path, "FROM ubi9\nLABEL name=\"operator\"\n").unwrap();
        let label = CpeLabel::for_version("1.21");

        assert_eq!(update_dockerfile(&path, &label, None).unwrap(), PatchOutcome::Updated);
        assert_eq!(update_dockerfile(&path, &label, None).unwrap(), PatchOutcome::Unchanged);
        assert!(std::fs::read_to_string(&path).unwrap().contains("1.21::el9"));
    }

    #[test]
    fn leaves_file_untouched_on_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.Dockerfile");
        std::fs::write(&path, "FROM ubi9\n").unwrap();

        let error = update_dockerfile(&path, &CpeLabel::for_version("1.21"), None).unwrap_err();

        assert!(matches!(error, PatchError::MissingLabelBlock));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "FROM ubi9\n");
    }

    #[test]
    fn reports_missing_file() {
        let error = update_dockerfile(
            Path::new("/nonexistent/x.Dockerfile"),
            &CpeLabel::for_version("1.21"),
            None,
        )
        .unwrap_err();

        assert!(matches!(error, PatchError::Io { .. }));
    }
}
