use thiserror::Error;

/// Errors from model-level parsing and construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Value is not a recognized canonical field name.
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    /// Value is not a recognized reminder threshold.
    #[error("unsupported reminder threshold: {0}")]
    UnknownThreshold(u32),
    /// Identifier could not be parsed.
    #[error("invalid id: {0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
