//! Quality filtering: raw table in, clean row set out.
//!
//! Stages run in a fixed order over the whole batch:
//!
//! 1. drop columns with too many missing values (structural)
//! 2. drop rows missing an essential field
//! 3. parse `price_num` / `area_num`
//! 4. drop rows with missing or non-positive price/area
//! 5. drop exact full-row duplicates
//! 6. trim price then area outliers to the batch [p1, p99] band
//! 7. resolve `bhk` and drop rows where it is missing or non-positive
//!
//! Each stage reports how many rows it removed (`StageCounts`); the counts
//! are informational, not a contract. An empty batch after any stage is
//! fatal: the pipeline halts rather than producing partial output.
//!
//! Outlier trimming is deliberately single-pass: the percentiles for each
//! column are computed once over the then-current batch, not iterated to a
//! fixed point.

pub mod parse;

use std::collections::HashSet;

use crate::domain::{CleanRow, CleanTable, ESSENTIAL_COLUMNS, PipelineConfig, RawTable, is_missing};
use crate::error::AppError;
use crate::math::quantile;

pub use parse::{parse_area, parse_price};

/// Rows removed per filter stage, for reporting.
#[derive(Debug, Clone, Default)]
pub struct StageCounts {
    pub rows_in: usize,
    pub columns_dropped: Vec<String>,
    pub missing_essential: usize,
    pub invalid_price_area: usize,
    pub duplicates: usize,
    pub price_outliers: usize,
    pub area_outliers: usize,
    pub invalid_bhk: usize,
    pub rows_out: usize,
}

/// Run every quality-filter stage over a raw table.
pub fn clean_table(
    raw: &RawTable,
    config: &PipelineConfig,
) -> Result<(CleanTable, StageCounts), AppError> {
    let mut counts = StageCounts {
        rows_in: raw.rows.len(),
        ..StageCounts::default()
    };

    if raw.rows.is_empty() {
        return Err(AppError::empty("Input table has no rows."));
    }

    // Stage 1: structural column drop.
    let (columns, mut rows) = drop_sparse_columns(raw, config.missing_col_threshold, &mut counts);

    // Essential columns entirely absent from the schema is a structural
    // failure, not a row-level one.
    for name in ESSENTIAL_COLUMNS {
        if !columns.iter().any(|c| c == name) {
            return Err(AppError::io(format!(
                "Essential column `{name}` is absent from the input schema."
            )));
        }
    }
    let table = RawTable {
        columns: columns.clone(),
        rows: Vec::new(),
    };

    // Stage 2: essential-field row drop.
    let before = rows.len();
    rows.retain(|row| {
        ESSENTIAL_COLUMNS
            .iter()
            .all(|name| table.cell(row, name).is_some())
    });
    counts.missing_essential = before - rows.len();
    ensure_non_empty(&rows, "essential-field filter")?;

    // Stages 3 + 4: parse price/area, drop missing or non-positive.
    let price_idx = table.col("price").expect("validated above");
    let size_idx = table.col("size").expect("validated above");

    let before = rows.len();
    let mut parsed: Vec<(Vec<String>, f64, f64)> = Vec::with_capacity(rows.len());
    for row in rows {
        let price = parse_price(&row[price_idx]);
        let area = parse_area(&row[size_idx]);
        if let (Some(p), Some(a)) = (price, area) {
            if p > 0.0 && a > 0.0 {
                parsed.push((row, p, a));
            }
        }
    }
    counts.invalid_price_area = before - parsed.len();
    if parsed.is_empty() {
        return Err(AppError::empty("No rows survived the price/area filter."));
    }

    // Stage 5: exact full-row duplicates (all remaining columns equal).
    let before = parsed.len();
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(parsed.len());
    parsed.retain(|(row, _, _)| seen.insert(row.clone()));
    counts.duplicates = before - parsed.len();

    // Stage 6: outlier band trim, price first, then area. Each filter
    // computes its quantiles over whatever the previous one left.
    let before = parsed.len();
    trim_outliers(&mut parsed, |r| r.1, config)?;
    counts.price_outliers = before - parsed.len();
    ensure_parsed_non_empty(&parsed, "price outlier trim")?;

    let before = parsed.len();
    trim_outliers(&mut parsed, |r| r.2, config)?;
    counts.area_outliers = before - parsed.len();
    ensure_parsed_non_empty(&parsed, "area outlier trim")?;

    // Stage 7: resolve bhk and drop rows without a usable value.
    let bhk_idx = table.col("bhk");
    let no_of_bhk_idx = table.col("no_of_bhk");

    let before = parsed.len();
    let mut clean_rows: Vec<CleanRow> = Vec::with_capacity(parsed.len());
    for (cells, price_num, area_num) in parsed {
        let bhk = resolve_bhk(&cells, bhk_idx, no_of_bhk_idx);
        if let Some(bhk) = bhk {
            if bhk > 0.0 {
                clean_rows.push(CleanRow {
                    cells,
                    price_num,
                    area_num,
                    bhk,
                });
            }
        }
    }
    counts.invalid_bhk = before - clean_rows.len();
    if clean_rows.is_empty() {
        return Err(AppError::empty("No rows survived the bhk filter."));
    }

    counts.rows_out = clean_rows.len();
    Ok((
        CleanTable {
            columns,
            rows: clean_rows,
        },
        counts,
    ))
}

/// Drop columns whose missing fraction across the batch exceeds `threshold`,
/// projecting every row onto the surviving columns.
fn drop_sparse_columns(
    raw: &RawTable,
    threshold: f64,
    counts: &mut StageCounts,
) -> (Vec<String>, Vec<Vec<String>>) {
    let n = raw.rows.len() as f64;
    let mut keep: Vec<usize> = Vec::with_capacity(raw.columns.len());

    for (idx, name) in raw.columns.iter().enumerate() {
        let missing = raw
            .rows
            .iter()
            .filter(|row| row.get(idx).map(|c| is_missing(c)).unwrap_or(true))
            .count() as f64;
        if missing / n > threshold {
            counts.columns_dropped.push(name.clone());
        } else {
            keep.push(idx);
        }
    }

    let columns = keep.iter().map(|&i| raw.columns[i].clone()).collect();
    let rows = raw
        .rows
        .iter()
        .map(|row| {
            keep.iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    (columns, rows)
}

/// Resolve the bhk count for one row: prefer a numeric `bhk` column, fall
/// back to the first integer run of `no_of_bhk` (e.g. `"3 BHK"`), and
/// default to 2 when neither column exists in the schema.
fn resolve_bhk(cells: &[String], bhk_idx: Option<usize>, no_of_bhk_idx: Option<usize>) -> Option<f64> {
    if let Some(idx) = bhk_idx {
        let s = cells[idx].trim();
        if is_missing(s) {
            return None;
        }
        return s.parse::<f64>().ok().filter(|v| v.is_finite());
    }
    if let Some(idx) = no_of_bhk_idx {
        return first_int_run(&cells[idx]);
    }
    Some(2.0)
}

/// First run of ASCII digits anywhere in the string, as a float.
fn first_int_run(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok()
}

fn trim_outliers<F>(
    parsed: &mut Vec<(Vec<String>, f64, f64)>,
    value: F,
    config: &PipelineConfig,
) -> Result<(), AppError>
where
    F: Fn(&(Vec<String>, f64, f64)) -> f64,
{
    let values: Vec<f64> = parsed.iter().map(&value).collect();
    let lo = quantile(&values, config.outlier_low_q)
        .ok_or_else(|| AppError::empty("Cannot compute outlier band over an empty batch."))?;
    let hi = quantile(&values, config.outlier_high_q)
        .ok_or_else(|| AppError::empty("Cannot compute outlier band over an empty batch."))?;
    parsed.retain(|r| {
        let v = value(r);
        v >= lo && v <= hi
    });
    Ok(())
}

fn ensure_non_empty(rows: &[Vec<String>], stage: &str) -> Result<(), AppError> {
    if rows.is_empty() {
        return Err(AppError::empty(format!("No rows survived the {stage}.")));
    }
    Ok(())
}

fn ensure_parsed_non_empty(rows: &[(Vec<String>, f64, f64)], stage: &str) -> Result<(), AppError> {
    if rows.is_empty() {
        return Err(AppError::empty(format!("No rows survived the {stage}.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new("unused.csv".into())
    }

    #[test]
    fn survivors_have_positive_price_and_area() {
        // Valid rows share price/area so the percentile band trims nothing.
        let raw = table(
            &["price", "size", "city_name"],
            &[
                &["75 Lac", "1,000 sq.ft", "Mumbai"],
                &["abc", "900", "Delhi"],
                &["50 Lac", "no data", "Delhi"],
                &["75 Lac", "1,000 sq.ft", "Pune"],
                &["75 Lac", "1,000 sq.ft", "Chennai"],
            ],
        );
        let (clean, counts) = clean_table(&raw, &config()).unwrap();
        assert_eq!(clean.rows.len(), 3);
        assert_eq!(counts.invalid_price_area, 2);
        for row in &clean.rows {
            assert!(row.price_num > 0.0);
            assert!(row.area_num > 0.0);
        }
    }

    #[test]
    fn end_to_end_mumbai_row() {
        let raw = table(
            &["price", "size", "city_name"],
            &[&["75 Lac", "1,000 sq.ft", "Mumbai"]],
        );
        let (clean, _) = clean_table(&raw, &config()).unwrap();
        let row = &clean.rows[0];
        assert!((row.price_num - 7_500_000.0).abs() < 1e-9);
        assert!((row.area_num - 1000.0).abs() < 1e-9);
        assert!((row.price_num / row.area_num - 7500.0).abs() < 1e-9);
        // no bhk column in the schema: defaults to 2
        assert!((row.bhk - 2.0).abs() < 1e-12);
    }

    #[test]
    fn duplicates_are_dropped_keeping_first() {
        let raw = table(
            &["price", "size", "city_name"],
            &[
                &["50 Lac", "900", "Delhi"],
                &["50 Lac", "900", "Delhi"],
                &["50 Lac", "900", "Mumbai"],
            ],
        );
        let (clean, counts) = clean_table(&raw, &config()).unwrap();
        assert_eq!(counts.duplicates, 1);
        assert_eq!(clean.rows.len(), 2);
    }

    #[test]
    fn sparse_columns_are_dropped() {
        let raw = table(
            &["price", "size", "city_name", "bath"],
            &[
                &["50 Lac", "900", "Delhi", ""],
                &["50 Lac", "900", "Mumbai", ""],
                &["50 Lac", "900", "Chennai", "2"],
                &["50 Lac", "900", "Pune", ""],
            ],
        );
        let (clean, counts) = clean_table(&raw, &config()).unwrap();
        assert_eq!(counts.columns_dropped, vec!["bath".to_string()]);
        assert!(clean.col("bath").is_none());
    }

    #[test]
    fn missing_essential_column_is_fatal() {
        let raw = table(&["price", "size"], &[&["50 Lac", "900"]]);
        let err = clean_table(&raw, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn outlier_trim_is_single_pass() {
        // 100 distinct prices: the [p1, p99] band removes the extremes once;
        // re-running the same stage on the trimmed batch (with recomputed
        // percentiles) removes more rows, confirming single-pass semantics
        // rather than a fixed point.
        let rows_owned: Vec<Vec<String>> = (1..=100)
            .map(|i| vec![format!("{}", i * 100_000), "900".to_string(), "Delhi".to_string()])
            .collect();
        let raw = RawTable {
            columns: vec!["price".into(), "size".into(), "city_name".into()],
            rows: rows_owned,
        };

        let (clean, counts) = clean_table(&raw, &config()).unwrap();
        let first_pass_rows = clean.rows.len();
        assert!(counts.price_outliers > 0);

        // Feed the survivors back through: quantiles are recomputed, so the
        // new band is tighter and trims again.
        let raw2 = RawTable {
            columns: clean.columns.clone(),
            rows: clean.rows.iter().map(|r| r.cells.clone()).collect(),
        };
        let (clean2, counts2) = clean_table(&raw2, &config()).unwrap();
        assert!(counts2.price_outliers > 0);
        assert!(clean2.rows.len() < first_pass_rows);
    }

    #[test]
    fn bhk_extracted_from_no_of_bhk() {
        let raw = table(
            &["price", "size", "city_name", "no_of_bhk"],
            &[
                &["50 Lac", "900", "Delhi", "3 BHK"],
                &["50 Lac", "900", "Delhi", "2 BHK"],
            ],
        );
        let (clean, _) = clean_table(&raw, &config()).unwrap();
        let mut bhks: Vec<f64> = clean.rows.iter().map(|r| r.bhk).collect();
        bhks.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(bhks, vec![2.0, 3.0]);
    }

    #[test]
    fn non_positive_bhk_rows_are_dropped() {
        let raw = table(
            &["price", "size", "city_name", "bhk"],
            &[
                &["50 Lac", "900", "Delhi", "0"],
                &["50 Lac", "900", "Mumbai", "2"],
            ],
        );
        let (clean, counts) = clean_table(&raw, &config()).unwrap();
        assert_eq!(counts.invalid_bhk, 1);
        assert_eq!(clean.rows.len(), 1);
    }
}
