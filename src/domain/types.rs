//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages as plain values
//! - exported to CSV/JSON
//! - reloaded later by the serving layer

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns whose absence disqualifies a row outright.
///
/// Header names are compared after normalization (trimmed, BOM-stripped,
/// lowercased), so the source CSV may spell these `Price`, `Size`, `City_name`.
pub const ESSENTIAL_COLUMNS: [&str; 3] = ["price", "size", "city_name"];

/// Is this cell value considered missing?
///
/// CSV extracts encode missing values inconsistently; we accept the common
/// spellings emitted by spreadsheet tools and dataframe exports.
pub fn is_missing(cell: &str) -> bool {
    let s = cell.trim();
    s.is_empty()
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("null")
}

/// A raw listings table as read from CSV: normalized column names plus one
/// `Vec<String>` of cells per row. No invariants; cells may be missing,
/// malformed, or out of range.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a (normalized) column name, if present.
    pub fn col(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A cell as `Some(&str)` only when it holds a real value.
    pub fn cell<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = self.col(name)?;
        let s = row.get(idx)?.trim();
        if is_missing(s) { None } else { Some(s) }
    }
}

/// A row that has passed every quality-filter stage.
///
/// Guarantees: `price_num > 0`, `area_num > 0`, `bhk > 0`, essential fields
/// present, no exact duplicate of another clean row, and price/area inside
/// the batch [p1, p99] band.
#[derive(Debug, Clone)]
pub struct CleanRow {
    pub cells: Vec<String>,
    pub price_num: f64,
    pub area_num: f64,
    pub bhk: f64,
}

/// The surviving row set, with the (possibly reduced) column list.
#[derive(Debug, Clone)]
pub struct CleanTable {
    pub columns: Vec<String>,
    pub rows: Vec<CleanRow>,
}

impl CleanTable {
    pub fn col(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A cell of a clean row as `Some(&str)` only when it holds a real value.
    pub fn cell<'a>(&self, row: &'a CleanRow, name: &str) -> Option<&'a str> {
        let idx = self.col(name)?;
        let s = row.cells.get(idx)?.trim();
        if is_missing(s) { None } else { Some(s) }
    }
}

/// Area-size bucket of a listing.
///
/// Buckets are half-open with the upper bound inclusive: small is `(0, 1000]`
/// sq.ft, medium `(1000, 2000]`, large everything above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaCat {
    Small,
    Medium,
    Large,
}

impl AreaCat {
    pub fn from_area(area_num: f64) -> Self {
        if area_num <= 1000.0 {
            AreaCat::Small
        } else if area_num <= 2000.0 {
            AreaCat::Medium
        } else {
            AreaCat::Large
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AreaCat::Small => "small",
            AreaCat::Medium => "medium",
            AreaCat::Large => "large",
        }
    }

    /// All levels in bucket order (used for one-hot encoding).
    pub fn levels() -> [&'static str; 3] {
        ["small", "medium", "large"]
    }
}

/// A clean row augmented with every derived numeric feature.
///
/// All fields are pure functions of the clean row except `demand_density`
/// and `price_dev_locality`, which depend on aggregate statistics over the
/// whole clean batch and must be recomputed whenever the batch changes.
#[derive(Debug, Clone)]
pub struct EngineeredRecord {
    pub price_num: f64,
    pub area_num: f64,
    pub price_per_sqft: f64,

    pub bhk: f64,
    pub price_per_bhk: f64,
    pub area_per_bhk: f64,

    pub bath: f64,
    pub price_per_bath: f64,

    /// Batch-scope: number of clean rows sharing this row's locality.
    pub demand_density: f64,
    /// Batch-scope: `price_per_sqft` minus the locality mean.
    pub price_dev_locality: f64,

    pub is_furnished: f64,
    pub is_rera_registered: f64,
    pub is_apartment: f64,
    pub listing_domain_score: f64,
    pub luxury_index: f64,

    pub area_cat: AreaCat,
    pub dist_city_center: f64,

    /// Raw categorical values kept for one-hot encoding.
    pub locality: Option<String>,
    pub city: Option<String>,
}

/// The frozen, ordered list of final feature columns.
///
/// Built once at training time and persisted inside the model artifact;
/// the serving encoder consumes it read-only. Column order is:
/// base numerics, locality one-hots, city one-hots, area-cat one-hots.
/// Each one-hot group drops one reference category (`other` for the
/// free-text groups, `small` for area-cat), so a value outside the kept
/// levels encodes as the all-zero pattern for that group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpace {
    pub version: u32,
    /// Base numeric/derived feature names, in matrix order.
    pub base: Vec<String>,
    /// Kept locality levels (top-K by frequency, sorted by name).
    pub locality_levels: Vec<String>,
    /// Kept city levels (top-K by frequency, sorted by name).
    pub city_levels: Vec<String>,
    /// Kept area-cat levels (`medium`, `large`).
    pub area_cat_levels: Vec<String>,
    /// Full ordered column names (base + `loc_*` + `city_*` + `area_cat_*`).
    pub columns: Vec<String>,
}

impl FeatureSpace {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// Per-column standardization parameters (fitted on the training split).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    /// Per-column population standard deviation; zero-variance columns
    /// store 1.0 so transforming is always well-defined.
    pub scale: Vec<f64>,
}

/// Fitted ridge regressor parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeModel {
    pub alpha: f64,
    pub intercept: f64,
    pub coefs: Vec<f64>,
}

/// Held-out evaluation metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub n_test: usize,
}

/// The single persisted training artifact: feature space + scaler +
/// regressor, written once after a successful fit and loaded read-only by
/// the serving layer. Keeping all three in one file makes train/serve skew
/// structurally impossible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub tool: String,
    pub version: u32,
    pub asof_date: NaiveDate,
    pub feature_space: FeatureSpace,
    pub scaler: ScalerParams,
    pub regressor: RidgeModel,
    pub quality: FitQuality,
}

/// A sparse listing payload supplied by the serving caller.
///
/// Far fewer fields than a training row: the serving encoder reproduces only
/// the feature-space columns derivable from these, and fills the rest with 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingPayload {
    pub id: Option<i64>,
    pub area_sqft: Option<f64>,
    pub bhk: Option<f64>,
    pub listing_score: Option<f64>,
    pub is_furnished: bool,
    /// Small integer city code in {1..7}; see `features::matrix::CITY_IDS`.
    pub city_id: Option<u32>,
}

/// One prediction per input payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Option<i64>,
    pub prediction: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub artifact: Option<PathBuf>,
    pub export_cleaned: Option<PathBuf>,

    /// Drop columns whose missing fraction exceeds this.
    pub missing_col_threshold: f64,
    /// Outlier band quantiles for price/area trimming.
    pub outlier_low_q: f64,
    pub outlier_high_q: f64,

    /// Top-K cutoffs for categorical encoding.
    pub top_localities: usize,
    pub top_cities: usize,

    pub alpha: f64,
    pub test_size: f64,
    pub seed: u64,
}

impl PipelineConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            artifact: None,
            export_cleaned: None,
            missing_col_threshold: 0.25,
            outlier_low_q: 0.01,
            outlier_high_q: 0.99,
            top_localities: 20,
            top_cities: 10,
            alpha: 1.0,
            test_size: 0.2,
            seed: 42,
        }
    }
}
