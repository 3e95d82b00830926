//! Error types for file ingestion.

use thiserror::Error;

/// Errors that can occur while turning an uploaded file into a raw table.
///
/// Both variants abort ingestion before any downstream state is touched.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File extension is not one of the accepted formats.
    #[error("unsupported file format: {file_name}")]
    FormatUnsupported { file_name: String },

    /// File content could not be parsed as the declared format.
    #[error("failed to parse {file_name}: {message}")]
    ParseFailure { file_name: String, message: String },

    /// Requested header row index is outside the table.
    #[error("header row {index} out of range (table has {rows} rows)")]
    HeaderRowOutOfRange { index: usize, rows: usize },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
