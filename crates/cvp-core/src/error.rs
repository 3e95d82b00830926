//! Error types for pipeline operations.

use thiserror::Error;

use cvp_store::StoreError;

/// Hard errors returned to callers of pipeline operations.
///
/// Per-row import outcomes (missing CNPJ, duplicate) are never errors;
/// they degrade to summary counters.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A candidate contract failed validation; names the first unmet
    /// requirement.
    #[error("validation failed on field: {field}")]
    Validation { field: &'static str },

    /// The requested transition is not legal from the current state.
    #[error("invalid state transition for {entity} {id}: {from} -> {attempted}")]
    InvalidStateTransition {
        entity: &'static str,
        id: String,
        from: String,
        attempted: String,
    },

    /// The caller's identity does not permit this operation.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// Referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Tax-registry enrichment failed; always best-effort, never blocks
    /// contract creation.
    #[error("tax registry lookup failed: {0}")]
    ExternalLookup(String),

    /// File ingestion failed before any state was touched.
    #[error(transparent)]
    Ingest(#[from] cvp_ingest::IngestError),

    /// The storage collaborator failed.
    #[error("storage: {0}")]
    Storage(#[from] StoreError),
}

impl CoreError {
    /// Lifts a store error, converting row-absence into [`CoreError::NotFound`].
    pub(crate) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Storage(other),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CoreError>;
