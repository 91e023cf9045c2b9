//! Read/write the model artifact JSON.
//!
//! The artifact is the "portable" output of a training run: the frozen
//! feature space, the fitted scaler, and the fitted regressor, in one file.
//! Training writes it exactly once, after the fit succeeds; serving loads it
//! read-only at startup. The schema is defined by `domain::ModelArtifact`.

use std::fs::File;
use std::path::Path;

use crate::domain::ModelArtifact;
use crate::error::AppError;

/// Write a model artifact file.
pub fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create artifact '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::io(format!("Failed to write artifact JSON: {e}")))?;

    Ok(())
}

/// Read a model artifact file.
///
/// A missing or unreadable artifact is a configuration precondition failure
/// (exit code 2): serving must fail here, at load, not per-request.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Model artifact not found at '{}': {e}",
            path.display()
        ))
    })?;
    let artifact: ModelArtifact = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid model artifact JSON: {e}")))?;
    Ok(artifact)
}
