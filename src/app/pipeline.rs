//! The training pipeline as an explicit sequence of pure transformations.
//!
//! Each stage takes the previous stage's output and returns a new value:
//!
//! raw table -> clean table -> engineered records -> feature space ->
//! matrix -> split -> scale -> fit -> evaluate -> artifact
//!
//! There is no hidden cross-stage state beyond the batch itself, and nothing
//! is persisted until the whole chain has succeeded: a run either completes
//! and yields a full artifact, or fails and writes nothing.

use chrono::Utc;
use nalgebra::DVector;

use crate::clean::{StageCounts, clean_table};
use crate::domain::{CleanTable, FeatureSpace, ModelArtifact, PipelineConfig};
use crate::error::AppError;
use crate::features::encode::build_feature_space;
use crate::features::engineer_batch;
use crate::features::matrix::{build_matrix, build_target};
use crate::fit::{evaluate, fit_ridge, fit_scaler, predict, train_test_split, transform};
use crate::io::ingest::read_raw_table;
use crate::serve::PREDICTION_SCALE;

/// Outputs of a cleaning-only run.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub table: CleanTable,
    pub counts: StageCounts,
}

/// Outputs of a full training run. The artifact has not been written to
/// disk yet; the caller decides where it goes.
#[derive(Debug, Clone)]
pub struct TrainOutput {
    pub clean: CleanOutput,
    pub artifact: ModelArtifact,
    pub n_train: usize,
}

/// Load and clean the input table.
pub fn run_clean(config: &PipelineConfig) -> Result<CleanOutput, AppError> {
    let raw = read_raw_table(&config.input)?;
    let (table, counts) = clean_table(&raw, config)?;
    Ok(CleanOutput { table, counts })
}

/// Execute the full training pipeline.
pub fn run_train(config: &PipelineConfig) -> Result<TrainOutput, AppError> {
    let clean = run_clean(config)?;

    let records = engineer_batch(&clean.table);
    let space = build_feature_space(&records, config.top_localities, config.top_cities);

    let x = build_matrix(&records, &space);
    // The regressor is trained on the down-scaled target; serving multiplies
    // raw outputs back by the same constant.
    let y = build_target(&records).map(|v| v / PREDICTION_SCALE);

    let (train_idx, test_idx) = train_test_split(records.len(), config.test_size, config.seed)?;

    let x_train = x.select_rows(train_idx.iter());
    let y_train = DVector::from_iterator(train_idx.len(), train_idx.iter().map(|&i| y[i]));
    let x_test = x.select_rows(test_idx.iter());
    let y_test = DVector::from_iterator(test_idx.len(), test_idx.iter().map(|&i| y[i]));

    let scaler = fit_scaler(&x_train);
    let x_train_scaled = transform(&x_train, &scaler);
    let x_test_scaled = transform(&x_test, &scaler);

    let regressor = fit_ridge(&x_train_scaled, &y_train, config.alpha)?;

    let y_pred = predict(&regressor, &x_test_scaled);
    let quality = evaluate(&y_test, &y_pred);

    let artifact = ModelArtifact {
        tool: "propfit".to_string(),
        version: FeatureSpace::CURRENT_VERSION,
        asof_date: Utc::now().date_naive(),
        feature_space: space,
        scaler,
        regressor,
        quality,
    };

    Ok(TrainOutput {
        n_train: train_idx.len(),
        clean,
        artifact,
    })
}
