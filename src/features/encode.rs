//! Categorical encoding and feature-space construction.
//!
//! Locality and city are one-hot encoded over their top-K most frequent
//! training values; everything outside the top-K (and anything unseen later)
//! falls into the `other` bucket, which doubles as the dropped reference
//! category. Dropping one level per group avoids the linear-dependency trap
//! when a linear model is fitted downstream: with all levels present the
//! dummy columns of a group sum to the intercept column.
//!
//! The resulting ordered column list is the `FeatureSpace`. It is built
//! exactly once, at training time, and persisted; the serving encoder never
//! recomputes it.

use std::collections::HashMap;

use crate::domain::{AreaCat, EngineeredRecord, FeatureSpace};

/// Base numeric/derived features, in matrix order. One-hot groups follow.
pub const BASE_FEATURES: [&str; 13] = [
    "area_num",
    "bhk",
    "listing_domain_score",
    "is_furnished",
    "is_rera_registered",
    "is_apartment",
    "price_per_bhk",
    "area_per_bhk",
    "price_per_bath",
    "demand_density",
    "price_dev_locality",
    "luxury_index",
    "dist_city_center",
];

/// Default top-K cutoffs for the two free-text categorical fields.
pub const DEFAULT_TOP_LOCALITIES: usize = 20;
pub const DEFAULT_TOP_CITIES: usize = 10;

/// Freeze the feature space for a training batch.
///
/// Locality/city levels are the top-K most frequent values (ties broken by
/// name for determinism), listed lexicographically. The area-cat group keeps
/// its natural bucket order with `small` as the reference.
pub fn build_feature_space(
    records: &[EngineeredRecord],
    top_localities: usize,
    top_cities: usize,
) -> FeatureSpace {
    let locality_levels = top_levels(
        records.iter().filter_map(|r| r.locality.as_deref()),
        top_localities,
    );
    let city_levels = top_levels(records.iter().filter_map(|r| r.city.as_deref()), top_cities);
    let area_cat_levels: Vec<String> = AreaCat::levels()
        .iter()
        .skip(1) // `small` is the reference category
        .map(|s| s.to_string())
        .collect();

    let mut columns: Vec<String> = BASE_FEATURES.iter().map(|s| s.to_string()).collect();
    columns.extend(locality_levels.iter().map(|l| format!("loc_{l}")));
    columns.extend(city_levels.iter().map(|c| format!("city_{c}")));
    columns.extend(area_cat_levels.iter().map(|a| format!("area_cat_{a}")));

    FeatureSpace {
        version: FeatureSpace::CURRENT_VERSION,
        base: BASE_FEATURES.iter().map(|s| s.to_string()).collect(),
        locality_levels,
        city_levels,
        area_cat_levels,
        columns,
    }
}

/// The K most frequent values, returned in lexicographic order.
fn top_levels<'a>(values: impl Iterator<Item = &'a str>, k: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut by_freq: Vec<(&str, usize)> = counts.into_iter().collect();
    by_freq.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    by_freq.truncate(k);

    let mut levels: Vec<String> = by_freq.into_iter().map(|(v, _)| v.to_string()).collect();
    levels.sort();
    levels
}

/// One-hot a categorical value against a kept-level list: 1.0 in the slot of
/// its level, all zeros otherwise (the `other`/reference encoding). Unseen
/// values therefore never create or shift columns.
pub fn one_hot_into(value: Option<&str>, levels: &[String], out: &mut Vec<f64>) {
    for level in levels {
        let hit = value.map(|v| v == level).unwrap_or(false);
        out.push(if hit { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(locality: Option<&str>, city: &str) -> EngineeredRecord {
        EngineeredRecord {
            price_num: 5e6,
            area_num: 1000.0,
            price_per_sqft: 5000.0,
            bhk: 2.0,
            price_per_bhk: 2.5e6,
            area_per_bhk: 500.0,
            bath: 2.0,
            price_per_bath: 5e6 / 3.0,
            demand_density: 0.0,
            price_dev_locality: 0.0,
            is_furnished: 0.0,
            is_rera_registered: 0.0,
            is_apartment: 0.0,
            listing_domain_score: 0.0,
            luxury_index: 1.0,
            area_cat: AreaCat::Small,
            dist_city_center: 0.0,
            locality: locality.map(str::to_string),
            city: Some(city.to_string()),
        }
    }

    #[test]
    fn top_k_with_drop_first_keeps_most_frequent() {
        // localities {A:50, B:30, C:5}, K=1: only A survives; B/C collapse to
        // the `other` reference and produce no column.
        let mut records = Vec::new();
        for _ in 0..50 {
            records.push(record(Some("A"), "Mumbai"));
        }
        for _ in 0..30 {
            records.push(record(Some("B"), "Mumbai"));
        }
        for _ in 0..5 {
            records.push(record(Some("C"), "Mumbai"));
        }

        let fs = build_feature_space(&records, 1, 10);
        assert_eq!(fs.locality_levels, vec!["A".to_string()]);
        assert!(fs.index_of("loc_A").is_some());
        assert!(fs.index_of("loc_B").is_none());
        assert!(fs.index_of("loc_other").is_none());

        // An unseen locality maps to the all-zero row for the group.
        let mut row = Vec::new();
        one_hot_into(Some("Z"), &fs.locality_levels, &mut row);
        assert_eq!(row, vec![0.0]);

        let mut row = Vec::new();
        one_hot_into(Some("A"), &fs.locality_levels, &mut row);
        assert_eq!(row, vec![1.0]);
    }

    #[test]
    fn levels_are_sorted_lexicographically() {
        let mut records = Vec::new();
        for name in ["Powai", "Andheri", "Chembur", "Andheri"] {
            records.push(record(Some(name), "Mumbai"));
        }
        let fs = build_feature_space(&records, 3, 10);
        assert_eq!(
            fs.locality_levels,
            vec!["Andheri".to_string(), "Chembur".to_string(), "Powai".to_string()]
        );
    }

    #[test]
    fn column_order_is_base_then_groups() {
        let records = vec![record(Some("Powai"), "Mumbai")];
        let fs = build_feature_space(&records, 20, 10);

        assert_eq!(&fs.columns[..13], &BASE_FEATURES.map(String::from)[..]);
        assert_eq!(fs.columns[13], "loc_Powai");
        assert_eq!(fs.columns[14], "city_Mumbai");
        assert_eq!(fs.columns[15], "area_cat_medium");
        assert_eq!(fs.columns[16], "area_cat_large");
        assert_eq!(fs.len(), 17);
    }

    #[test]
    fn area_cat_reference_is_small() {
        let records = vec![record(None, "Mumbai")];
        let fs = build_feature_space(&records, 20, 10);
        assert!(fs.index_of("area_cat_small").is_none());
        assert!(fs.index_of("area_cat_medium").is_some());
        assert!(fs.index_of("area_cat_large").is_some());
    }
}
