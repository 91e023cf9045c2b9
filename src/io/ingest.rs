//! Raw CSV ingest.
//!
//! This module only gets the bytes into a `RawTable`; all validation and
//! filtering lives in `clean`. Two tolerances matter here:
//!
//! - **Header normalization**: trimmed, BOM-stripped, lowercased, so the
//!   pipeline can address `Price` / `Size` / `City_name` uniformly.
//! - **Legacy encodings**: listing extracts are often latin-1-ish rather
//!   than UTF-8, so we read byte records and decode lossily instead of
//!   failing on the first non-UTF-8 locality name.

use std::fs::File;
use std::path::Path;

use crate::domain::RawTable;
use crate::error::AppError;

/// Read a delimited file into a `RawTable`.
pub fn read_raw_table(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .byte_headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .map(|h| normalize_header_name(&String::from_utf8_lossy(h)))
        .collect();
    if columns.is_empty() {
        return Err(AppError::io("CSV has no header row."));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.byte_records() {
        let record =
            result.map_err(|e| AppError::io(format!("CSV parse error: {e}")))?;
        let mut row: Vec<String> = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).trim().to_string())
            .collect();
        // Flexible readers can yield short/long rows; normalize the width so
        // later column indexing is always in bounds.
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿Price"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}
