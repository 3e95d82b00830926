//! Column mapping configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cvp_model::CanonicalField;

/// Mapping from source column labels to canonical fields.
///
/// Each source label maps to at most one field; columns without an entry
/// (or mapped to nothing) are dropped silently during projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, CanonicalField>,
}

impl ColumnMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a source column to a canonical field, replacing any
    /// previous assignment for that column.
    pub fn assign(&mut self, source_label: impl Into<String>, field: CanonicalField) {
        self.entries.insert(source_label.into(), field);
    }

    /// Clears the assignment for a source column.
    pub fn unassign(&mut self, source_label: &str) {
        self.entries.remove(source_label);
    }

    #[must_use]
    pub fn field_for(&self, source_label: &str) -> Option<CanonicalField> {
        self.entries.get(source_label).copied()
    }

    /// Canonical fields covered by at least one source column.
    #[must_use]
    pub fn mapped_fields(&self) -> Vec<CanonicalField> {
        let mut fields: Vec<CanonicalField> = self.entries.values().copied().collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Required fields that no source column is mapped to.
    #[must_use]
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        let mapped = self.mapped_fields();
        CanonicalField::REQUIRED
            .iter()
            .copied()
            .filter(|field| !mapped.contains(field))
            .collect()
    }

    /// True when every required field is covered.
    #[must_use]
    pub fn covers_required(&self) -> bool {
        self.missing_required().is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
