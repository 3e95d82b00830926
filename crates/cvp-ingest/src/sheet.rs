//! Spreadsheet workbook parsing.
//!
//! Only the first worksheet is read, matching the legacy import behavior.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::error::{IngestError, Result};

/// Parses workbook bytes (`.xlsx`/`.xls`) into rows of cells.
pub fn parse_workbook(bytes: &[u8], file_name: &str) -> Result<Vec<Vec<String>>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|err| IngestError::ParseFailure {
            file_name: file_name.to_string(),
            message: err.to_string(),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::ParseFailure {
            file_name: file_name.to_string(),
            message: "workbook has no sheets".to_string(),
        })?
        .map_err(|err| IngestError::ParseFailure {
            file_name: file_name.to_string(),
            message: err.to_string(),
        })?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        rows.push(cells);
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => {
            // Spreadsheets store integers as floats; render them without
            // the trailing fraction so ids and day counts survive.
            if value.fract() == 0.0 && value.abs() < 1e15 {
                format!("{}", *value as i64)
            } else {
                value.to_string()
            }
        }
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.date().to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Error(value) => format!("{value:?}"),
    }
}
