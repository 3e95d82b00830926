//! Delimited-text parsing.

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Parses CSV bytes into rows of cells.
///
/// Reads without a header assumption so the header row can be chosen
/// later; rows that are entirely blank are dropped.
pub fn parse_csv(bytes: &[u8], file_name: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| IngestError::ParseFailure {
            file_name: file_name.to_string(),
            message: err.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}
