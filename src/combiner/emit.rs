//! Serializing a batch into the combined artifact.

use crate::config::FileCollisionAction;
use crate::error::{EmitError, Result};
use crate::types::BatchResult;
use crate::utils::get_unique_path;
use std::path::{Path, PathBuf};

/// Filename of the combined artifact
pub const ARTIFACT_FILENAME: &str = "combined_guest.json";

/// Media type of the combined artifact
pub const ARTIFACT_CONTENT_TYPE: &str = "application/json";

/// The single serialized output of a batch
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Logical filename offered to the caller
    pub filename: &'static str,
    /// Declared media type
    pub content_type: &'static str,
    /// Pretty-printed JSON array of `{ "uid", "password" }` objects
    pub bytes: Vec<u8>,
}

/// Serialize the records of `result` into an [`Artifact`]
///
/// Only the records are written, in batch order; failures stay out of the
/// artifact. Callers are expected to check [`BatchResult::is_empty`] first.
///
/// # Errors
///
/// Returns [`EmitError::Serialization`] if the serializer fails.
pub fn emit(result: &BatchResult) -> std::result::Result<Artifact, EmitError> {
    let bytes = serde_json::to_vec_pretty(&result.records)?;

    Ok(Artifact {
        filename: ARTIFACT_FILENAME,
        content_type: ARTIFACT_CONTENT_TYPE,
        bytes,
    })
}

impl Artifact {
    /// Write the artifact into `dir`, resolving name collisions per `action`
    ///
    /// Creates `dir` if needed and returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written, or
    /// [`Error::FileCollision`](crate::Error::FileCollision) when `action` is
    /// `Skip` and the file already exists.
    pub async fn write_to_dir(&self, dir: &Path, action: FileCollisionAction) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;

        let path = get_unique_path(&dir.join(self.filename), action)?;
        tokio::fs::write(&path, &self.bytes).await?;

        tracing::info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            "wrote combined artifact"
        );
        Ok(path)
    }
}
