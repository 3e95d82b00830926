//! The raw table shape shared by every accepted file format.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// An uploaded file parsed into rows of raw cell values.
///
/// All parsed rows are kept so the header row can be re-selected without
/// re-parsing the source bytes: rows up to and including
/// `header_row_index` are treated as preamble, the row at the index
/// supplies column labels, and later rows are data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
    header_row_index: usize,
}

impl RawTable {
    /// Builds a table from parsed rows, auto-detecting the header row.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let header_row_index = detect_header_row(&rows);
        Self {
            rows,
            header_row_index,
        }
    }

    /// Index of the row currently serving as the header.
    #[must_use]
    pub fn header_row_index(&self) -> usize {
        self.header_row_index
    }

    /// Column labels taken from the current header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        self.rows
            .get(self.header_row_index)
            .map_or(&[], Vec::as_slice)
    }

    /// Data rows below the current header row.
    #[must_use]
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.header_row_index + 1 >= self.rows.len() {
            &[]
        } else {
            &self.rows[self.header_row_index + 1..]
        }
    }

    /// Re-selects which row supplies column labels.
    ///
    /// Re-slices the already-parsed rows; the source bytes are not read
    /// again.
    pub fn select_header_row(&mut self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(IngestError::HeaderRowOutOfRange {
                index,
                rows: self.rows.len(),
            });
        }
        self.header_row_index = index;
        Ok(())
    }

    /// Total number of parsed rows, header and preamble included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Heuristic pick of the initial header row.
///
/// Scans the first few rows and keeps the last header-like row before data
/// begins. A row is header-like when it is mostly non-empty text; a row is
/// data-like when a fair share of its cells are numeric or blank.
fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let scan = rows.len().min(5);
    let mut candidate = 0usize;
    for (idx, row) in rows.iter().enumerate().take(scan) {
        if idx > 0 && looks_like_data(row) {
            break;
        }
        if looks_like_header(row) {
            candidate = idx;
        }
    }
    candidate
}

fn cell_ratios(row: &[String]) -> (f64, f64, f64) {
    if row.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let total = row.len() as f64;
    let mut non_empty = 0usize;
    let mut numeric = 0usize;
    let mut alpha = 0usize;
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_empty += 1;
        if trimmed.replace([',', '.'], "").parse::<f64>().is_ok() {
            numeric += 1;
        }
        if trimmed.chars().any(char::is_alphabetic) {
            alpha += 1;
        }
    }
    (
        non_empty as f64 / total,
        numeric as f64 / total,
        alpha as f64 / total,
    )
}

fn looks_like_header(row: &[String]) -> bool {
    let (non_empty, numeric, alpha) = cell_ratios(row);
    non_empty >= 0.8 && alpha >= 0.5 && numeric <= 0.1
}

fn looks_like_data(row: &[String]) -> bool {
    let (non_empty, numeric, _) = cell_ratios(row);
    numeric >= 0.2 || (1.0 - non_empty) >= 0.2
}
