//! Final feature-matrix assembly, for training and for serving.
//!
//! Training: one row per engineered record, columns exactly matching the
//! `FeatureSpace`, any non-finite value filled with 0.
//!
//! Serving: a single row built from a sparse payload over the *frozen*
//! feature space. Only the columns derivable from the payload are set
//! (`area_num`, `bhk`, `listing_domain_score`, `is_furnished`,
//! `area_per_bhk`, one city one-hot); everything else is 0. This is an
//! intentional reduced-fidelity encoding: position and value are reproduced
//! for what the payload can support, and the function is a deterministic
//! pure function of payload + feature space + the fixed id→city table.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{EngineeredRecord, FeatureSpace, ListingPayload};
use crate::features::encode::one_hot_into;

/// Fixed id→city lookup used by the serving encoder. Serving callers send a
/// coarse integer city code rather than a free-text city name.
pub const CITY_IDS: [(u32, &str); 7] = [
    (1, "Bangalore"),
    (2, "Chennai"),
    (3, "Delhi"),
    (4, "Hyderabad"),
    (5, "Kolkata"),
    (6, "Lucknow"),
    (7, "Mumbai"),
];

/// Assemble the training matrix: rows = records, columns = feature space.
pub fn build_matrix(records: &[EngineeredRecord], space: &FeatureSpace) -> DMatrix<f64> {
    let rows: Vec<Vec<f64>> = records
        .par_iter()
        .map(|r| record_row(r, space))
        .collect();

    let mut x = DMatrix::<f64>::zeros(records.len(), space.len());
    for (i, row) in rows.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    x
}

/// The training target: `price_num` per record.
pub fn build_target(records: &[EngineeredRecord]) -> DVector<f64> {
    DVector::from_iterator(records.len(), records.iter().map(|r| r.price_num))
}

/// One training row in feature-space order, missing values filled with 0.
pub fn record_row(record: &EngineeredRecord, space: &FeatureSpace) -> Vec<f64> {
    let mut row = Vec::with_capacity(space.len());
    for name in &space.base {
        row.push(fill_zero(base_value(record, name)));
    }
    one_hot_into(record.locality.as_deref(), &space.locality_levels, &mut row);
    one_hot_into(record.city.as_deref(), &space.city_levels, &mut row);
    one_hot_into(
        Some(record.area_cat.label()),
        &space.area_cat_levels,
        &mut row,
    );
    row
}

/// One serving row over the frozen feature space.
pub fn serving_row(payload: &ListingPayload, space: &FeatureSpace) -> Vec<f64> {
    let mut row = vec![0.0; space.len()];

    let area = payload.area_sqft.unwrap_or(0.0);
    let bhk = payload.bhk.unwrap_or(0.0);

    set(&mut row, space, "area_num", area);
    set(&mut row, space, "bhk", bhk);
    // Serving payloads default the listing score to 5 when absent.
    set(
        &mut row,
        space,
        "listing_domain_score",
        payload.listing_score.unwrap_or(5.0),
    );
    set(
        &mut row,
        space,
        "is_furnished",
        if payload.is_furnished { 1.0 } else { 0.0 },
    );
    if area > 0.0 && bhk > 0.0 {
        set(&mut row, space, "area_per_bhk", area / bhk);
    }

    if let Some(city) = payload.city_id.and_then(city_name) {
        if let Some(idx) = space.index_of(&format!("city_{city}")) {
            row[idx] = 1.0;
        }
    }

    row
}

/// City name for a serving city code, if the code is known.
pub fn city_name(city_id: u32) -> Option<&'static str> {
    CITY_IDS
        .iter()
        .find(|(id, _)| *id == city_id)
        .map(|(_, name)| *name)
}

/// Value of a base feature column for one engineered record. Unknown names
/// read as 0 so a reloaded feature space from a newer schema never panics.
fn base_value(record: &EngineeredRecord, name: &str) -> f64 {
    match name {
        "area_num" => record.area_num,
        "bhk" => record.bhk,
        "listing_domain_score" => record.listing_domain_score,
        "is_furnished" => record.is_furnished,
        "is_rera_registered" => record.is_rera_registered,
        "is_apartment" => record.is_apartment,
        "price_per_bhk" => record.price_per_bhk,
        "area_per_bhk" => record.area_per_bhk,
        "price_per_bath" => record.price_per_bath,
        "demand_density" => record.demand_density,
        "price_dev_locality" => record.price_dev_locality,
        "luxury_index" => record.luxury_index,
        "dist_city_center" => record.dist_city_center,
        _ => 0.0,
    }
}

fn set(row: &mut [f64], space: &FeatureSpace, column: &str, value: f64) {
    if let Some(idx) = space.index_of(column) {
        row[idx] = fill_zero(value);
    }
}

fn fill_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AreaCat;
    use crate::features::encode::build_feature_space;

    fn record(city: &str, area: f64) -> EngineeredRecord {
        EngineeredRecord {
            price_num: 7.5e6,
            area_num: area,
            price_per_sqft: 7.5e6 / area,
            bhk: 2.0,
            price_per_bhk: 3.75e6,
            area_per_bhk: area / 2.0,
            bath: 2.0,
            price_per_bath: 2.5e6,
            demand_density: 0.0,
            price_dev_locality: 0.0,
            is_furnished: 0.0,
            is_rera_registered: 0.0,
            is_apartment: 0.0,
            listing_domain_score: 0.0,
            luxury_index: 1.0,
            area_cat: AreaCat::from_area(area),
            dist_city_center: 0.0,
            locality: None,
            city: Some(city.to_string()),
        }
    }

    #[test]
    fn matrix_shape_matches_feature_space() {
        let records = vec![record("Mumbai", 1000.0), record("Delhi", 2500.0)];
        let fs = build_feature_space(&records, 20, 10);
        let x = build_matrix(&records, &fs);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), fs.len());

        // area_cat one-hots: row 0 is small (all-zero group), row 1 is large.
        let medium = fs.index_of("area_cat_medium").unwrap();
        let large = fs.index_of("area_cat_large").unwrap();
        assert_eq!(x[(0, medium)], 0.0);
        assert_eq!(x[(0, large)], 0.0);
        assert_eq!(x[(1, large)], 1.0);
    }

    #[test]
    fn serving_row_from_sparse_payload() {
        let records = vec![record("Mumbai", 1000.0), record("Delhi", 2500.0)];
        let fs = build_feature_space(&records, 20, 10);

        let payload = ListingPayload {
            id: Some(1),
            area_sqft: Some(1000.0),
            bhk: Some(2.0),
            listing_score: Some(5.0),
            is_furnished: false,
            city_id: Some(7),
        };
        let row = serving_row(&payload, &fs);

        assert_eq!(row[fs.index_of("area_num").unwrap()], 1000.0);
        assert_eq!(row[fs.index_of("bhk").unwrap()], 2.0);
        assert_eq!(row[fs.index_of("area_per_bhk").unwrap()], 500.0);
        assert_eq!(row[fs.index_of("listing_domain_score").unwrap()], 5.0);
        assert_eq!(row[fs.index_of("city_Mumbai").unwrap()], 1.0);

        // every other column is zero
        let set_columns = [
            fs.index_of("area_num").unwrap(),
            fs.index_of("bhk").unwrap(),
            fs.index_of("area_per_bhk").unwrap(),
            fs.index_of("listing_domain_score").unwrap(),
            fs.index_of("city_Mumbai").unwrap(),
        ];
        for (j, v) in row.iter().enumerate() {
            if !set_columns.contains(&j) {
                assert_eq!(*v, 0.0, "column {} should be zero", fs.columns[j]);
            }
        }
    }

    #[test]
    fn serving_listing_score_defaults_to_five() {
        let records = vec![record("Mumbai", 1000.0)];
        let fs = build_feature_space(&records, 20, 10);
        let row = serving_row(&ListingPayload::default(), &fs);
        assert_eq!(row[fs.index_of("listing_domain_score").unwrap()], 5.0);
    }

    #[test]
    fn unknown_city_id_sets_no_city_column() {
        let records = vec![record("Mumbai", 1000.0)];
        let fs = build_feature_space(&records, 20, 10);
        let payload = ListingPayload {
            city_id: Some(99),
            ..ListingPayload::default()
        };
        let row = serving_row(&payload, &fs);
        let city_idx = fs.index_of("city_Mumbai").unwrap();
        assert_eq!(row[city_idx], 0.0);
    }
}
