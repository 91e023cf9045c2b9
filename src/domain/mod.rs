//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw/clean tabular data (`RawTable`, `CleanTable`)
//! - engineered per-listing records (`EngineeredRecord`, `AreaCat`)
//! - the frozen feature space and model artifact (`FeatureSpace`, `ModelArtifact`)
//! - run configuration (`PipelineConfig`)

pub mod types;

pub use types::*;
