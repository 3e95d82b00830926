//! Column mapping: arbitrary source column labels to canonical contract
//! fields.
//!
//! The projection is a pure function over an ingested table, so the wizard
//! can re-run it for live previews; suggestion helpers bootstrap a mapping
//! from recognizable Portuguese headers.

#![deny(unsafe_code)]

mod project;
mod suggest;
mod types;

pub use project::project;
pub use suggest::{MappingSuggestion, suggest, to_mapping};
pub use types::ColumnMapping;
