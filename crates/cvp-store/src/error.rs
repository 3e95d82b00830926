//! Error types for store operations.

use thiserror::Error;

/// Errors surfaced by the storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the given id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A row with the same unique key already exists.
    #[error("unique constraint {constraint} violated for key {key}")]
    UniqueViolation {
        constraint: &'static str,
        key: String,
    },

    /// Compare-and-swap precondition did not hold.
    #[error("{entity} {id}: expected status {expected}, found {found}")]
    Precondition {
        entity: &'static str,
        id: String,
        expected: String,
        found: String,
    },

    /// Snapshot file could not be read or written.
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot content could not be encoded or decoded.
    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
