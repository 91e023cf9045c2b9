//! Batch prediction against a frozen training artifact.
//!
//! `Predictor` is constructed once from a loaded artifact and then only read:
//! `predict_batch` takes `&self` and touches no shared mutable state, so
//! concurrent callers need no synchronization as long as the artifact is
//! never mutated after load (it has no mutating API).

use std::fs::File;
use std::path::Path;

use rayon::prelude::*;

use crate::domain::{ListingPayload, ModelArtifact, Prediction};
use crate::error::AppError;
use crate::features::matrix::serving_row;
use crate::fit::{predict_row, transform_row};
use crate::io::artifact::read_artifact;

/// Serving predictions are scaled back by this fixed factor.
///
/// The regressor is trained on a down-weighted target; the serving contract
/// multiplies every raw model output by 5 before returning it.
pub const PREDICTION_SCALE: f64 = 5.0;

/// A loaded, immutable prediction engine.
#[derive(Debug)]
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    /// Load the artifact from disk. Failure here is a configuration
    /// precondition error, reported once at startup rather than per request.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let artifact = read_artifact(path)?;
        Ok(Self::from_artifact(artifact))
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Predict a price for each payload.
    ///
    /// Each row is built over the frozen feature space, standardized with the
    /// training scaler, run through the regressor, and scaled back. A
    /// non-finite result is a prediction failure surfaced to the caller.
    pub fn predict_batch(&self, payloads: &[ListingPayload]) -> Result<Vec<Prediction>, AppError> {
        let space = &self.artifact.feature_space;
        let scaler = &self.artifact.scaler;
        let model = &self.artifact.regressor;

        payloads
            .par_iter()
            .map(|payload| {
                let row = serving_row(payload, space);
                let scaled = transform_row(&row, scaler);
                let raw = predict_row(model, &scaled);
                if !raw.is_finite() {
                    return Err(AppError::numeric(format!(
                        "Prediction failed: non-finite model output for payload id {:?}.",
                        payload.id
                    )));
                }
                Ok(Prediction {
                    id: payload.id,
                    prediction: raw * PREDICTION_SCALE,
                })
            })
            .collect()
    }
}

/// Read a JSON array of listing payloads.
pub fn read_payloads(path: &Path) -> Result<Vec<ListingPayload>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open payloads file '{}': {e}",
            path.display()
        ))
    })?;
    let payloads: Vec<ListingPayload> = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid payloads JSON: {e}")))?;
    Ok(payloads)
}
