//! Export the cleaned table to CSV.
//!
//! The export keeps the input's surviving columns and appends the parsed
//! numerics (`price_num`, `area_num`) plus `price_per_sqft`, so downstream
//! consumers can re-train without re-running the string parsers.

use std::fs::File;
use std::path::Path;

use crate::domain::CleanTable;
use crate::error::AppError;

/// Write a cleaned table to a CSV file.
pub fn write_cleaned_csv(path: &Path, table: &CleanTable) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create cleaned CSV '{}': {e}",
            path.display()
        ))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    header.extend(["price_num", "area_num", "price_per_sqft"]);
    writer
        .write_record(&header)
        .map_err(|e| AppError::io(format!("Failed to write cleaned CSV header: {e}")))?;

    for row in &table.rows {
        let mut record: Vec<String> = row.cells.clone();
        record.push(format!("{}", row.price_num));
        record.push(format!("{}", row.area_num));
        record.push(format!("{}", row.price_num / row.area_num));
        writer
            .write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write cleaned CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush cleaned CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CleanRow;

    #[test]
    fn cleaned_csv_round_trips_through_ingest() {
        let table = CleanTable {
            columns: vec!["price".into(), "size".into(), "city_name".into()],
            rows: vec![CleanRow {
                cells: vec!["75 Lac".into(), "1,000 sq.ft".into(), "Mumbai".into()],
                price_num: 7_500_000.0,
                area_num: 1000.0,
                bhk: 2.0,
            }],
        };

        let mut path = std::env::temp_dir();
        path.push(format!("propfit-export-{}.csv", std::process::id()));
        write_cleaned_csv(&path, &table).unwrap();

        let raw = crate::io::ingest::read_raw_table(&path).unwrap();
        assert_eq!(
            raw.columns,
            vec!["price", "size", "city_name", "price_num", "area_num", "price_per_sqft"]
        );
        assert_eq!(raw.rows[0][3], "7500000");
        assert_eq!(raw.rows[0][5], "7500");
        std::fs::remove_file(path).ok();
    }
}
