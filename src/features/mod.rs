//! Feature engineering: clean rows in, engineered records out.
//!
//! Most derived fields are pure per-record functions; two are batch-scope
//! (`demand_density`, `price_dev_locality`) and depend on aggregates over
//! the whole clean batch, so engineering always runs over a complete batch
//! and is rerun whenever the batch composition changes. Missing city-centre
//! distances are back-filled with the batch median in a final pass.

pub mod encode;
pub mod geo;
pub mod matrix;

use std::collections::HashMap;

use rayon::prelude::*;

use crate::domain::{AreaCat, CleanRow, CleanTable, EngineeredRecord};
use crate::math::median;

/// Engineer every derived feature for each clean row.
pub fn engineer_batch(table: &CleanTable) -> Vec<EngineeredRecord> {
    // Batch-scope aggregates: locality frequency and mean price-per-sqft.
    let mut counts: HashMap<&str, f64> = HashMap::new();
    let mut ppsf_sums: HashMap<&str, (f64, f64)> = HashMap::new();
    for row in &table.rows {
        if let Some(loc) = table.cell(row, "locality_name") {
            *counts.entry(loc).or_insert(0.0) += 1.0;
            let entry = ppsf_sums.entry(loc).or_insert((0.0, 0.0));
            entry.0 += row.price_num / row.area_num;
            entry.1 += 1.0;
        }
    }
    let ppsf_means: HashMap<&str, f64> = ppsf_sums
        .into_iter()
        .map(|(loc, (sum, n))| (loc, sum / n))
        .collect();

    let mut records: Vec<EngineeredRecord> = table
        .rows
        .par_iter()
        .map(|row| engineer_row(table, row, &counts, &ppsf_means))
        .collect();

    backfill_distances(&mut records);
    records
}

fn engineer_row(
    table: &CleanTable,
    row: &CleanRow,
    counts: &HashMap<&str, f64>,
    ppsf_means: &HashMap<&str, f64>,
) -> EngineeredRecord {
    let price_per_sqft = row.price_num / row.area_num;
    let bhk = row.bhk;

    let bath = table
        .cell(row, "bath")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(bhk);

    let locality = table.cell(row, "locality_name").map(str::to_string);
    let city = table.cell(row, "city_name").map(str::to_string);

    let demand_density = locality
        .as_deref()
        .and_then(|loc| counts.get(loc).copied())
        .unwrap_or(0.0);
    let price_dev_locality = locality
        .as_deref()
        .and_then(|loc| ppsf_means.get(loc))
        .map(|m| price_per_sqft - m)
        .unwrap_or(0.0);

    let is_furnished = parse_furnished(table.cell(row, "is_furnished"));
    let is_rera_registered = parse_boolish(table.cell(row, "is_rera_registered"));
    let is_apartment = parse_boolish(table.cell(row, "is_apartment"));
    let listing_domain_score = table
        .cell(row, "listing_domain_score")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);

    let bath_ratio = if bhk > 0.0 { bath / bhk } else { 0.0 };
    let luxury_index = bath_ratio + is_furnished + listing_domain_score;

    let dist_city_center = distance_for_row(table, row, city.as_deref());

    EngineeredRecord {
        price_num: row.price_num,
        area_num: row.area_num,
        price_per_sqft,
        bhk,
        price_per_bhk: row.price_num / bhk,
        area_per_bhk: row.area_num / bhk,
        bath,
        // +1 is a deliberate smoothing constant (also guards bath = 0).
        price_per_bath: row.price_num / (bath + 1.0),
        demand_density,
        price_dev_locality,
        is_furnished,
        is_rera_registered,
        is_apartment,
        listing_domain_score,
        luxury_index,
        area_cat: AreaCat::from_area(row.area_num),
        dist_city_center,
        locality,
        city,
    }
}

/// Map the furnished text field to 1/0; anything unrecognized is 0.
fn parse_furnished(cell: Option<&str>) -> f64 {
    match cell.map(|s| s.to_lowercase()) {
        Some(s) if s == "furnished" => 1.0,
        _ => 0.0,
    }
}

/// Coerce a boolean-ish cell (`true`/`false`, `1`/`0`, numbers) to 1/0.
fn parse_boolish(cell: Option<&str>) -> f64 {
    let Some(s) = cell else { return 0.0 };
    if s.eq_ignore_ascii_case("true") {
        return 1.0;
    }
    match s.parse::<f64>() {
        Ok(v) if v != 0.0 && v.is_finite() => 1.0,
        _ => 0.0,
    }
}

/// Distance to the city centre, or NaN when coordinates/city are unusable.
/// NaN marks the value for median back-fill.
fn distance_for_row(table: &CleanTable, row: &CleanRow, city: Option<&str>) -> f64 {
    let lat = table
        .cell(row, "latitude")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite());
    let lon = table
        .cell(row, "longitude")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite());

    match (city, lat, lon) {
        (Some(city), Some(lat), Some(lon)) => {
            geo::dist_to_city_center(city, lat, lon).unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Replace NaN distances with the batch median of the known ones, or 0 when
/// the entire batch lacks distances.
fn backfill_distances(records: &mut [EngineeredRecord]) {
    let known: Vec<f64> = records
        .iter()
        .map(|r| r.dist_city_center)
        .filter(|d| d.is_finite())
        .collect();
    let fill = median(&known).unwrap_or(0.0);
    for r in records {
        if !r.dist_city_center.is_finite() {
            r.dist_city_center = fill;
        }
    }
}
