//! Mapping suggestions for the import wizard.
//!
//! Source spreadsheets arrive with free-form Portuguese headers. Exact
//! synonym matches are preferred; otherwise Jaro-Winkler similarity
//! against the field names and their synonyms fills the gaps.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::{Deserialize, Serialize};

use cvp_model::CanonicalField;

use crate::types::ColumnMapping;

/// Minimum similarity for a fuzzy suggestion to be offered at all.
const CONFIDENCE_FLOOR: f64 = 0.82;
/// Confidence reported for exact synonym hits.
const SYNONYM_CONFIDENCE: f32 = 1.0;

/// A suggested assignment of one source column to one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub source_column: String,
    pub field: CanonicalField,
    /// Confidence score in `0.0..=1.0`.
    pub confidence: f32,
}

/// Suggests a canonical field for each source column where one can be
/// inferred; columns with no plausible match are left out.
#[must_use]
pub fn suggest(columns: &[String]) -> Vec<MappingSuggestion> {
    columns
        .iter()
        .filter_map(|column| {
            suggest_field(column).map(|(field, confidence)| MappingSuggestion {
                source_column: column.clone(),
                field,
                confidence,
            })
        })
        .collect()
}

/// Folds suggestions into a [`ColumnMapping`], keeping for each canonical
/// field only the most confident source column.
#[must_use]
pub fn to_mapping(suggestions: &[MappingSuggestion]) -> ColumnMapping {
    let mut best: Vec<&MappingSuggestion> = Vec::new();
    for suggestion in suggestions {
        match best.iter_mut().find(|s| s.field == suggestion.field) {
            Some(slot) if slot.confidence < suggestion.confidence => *slot = suggestion,
            Some(_) => {}
            None => best.push(suggestion),
        }
    }
    let mut mapping = ColumnMapping::new();
    for suggestion in best {
        mapping.assign(suggestion.source_column.clone(), suggestion.field);
    }
    mapping
}

fn suggest_field(column: &str) -> Option<(CanonicalField, f32)> {
    let normalized = normalize_label(column);
    if normalized.is_empty() {
        return None;
    }

    for (field, synonyms) in SYNONYMS {
        if synonyms.iter().any(|syn| *syn == normalized) {
            return Some((*field, SYNONYM_CONFIDENCE));
        }
    }

    let mut best: Option<(CanonicalField, f64)> = None;
    for (field, synonyms) in SYNONYMS {
        for candidate in std::iter::once(&field.as_str()).chain(synonyms.iter()) {
            let score = jaro_similarity(normalized.chars(), candidate.chars());
            if score >= CONFIDENCE_FLOOR && best.is_none_or(|(_, s)| score > s) {
                best = Some((*field, score));
            }
        }
    }
    best.map(|(field, score)| (field, score as f32))
}

/// Lowercases, folds common Portuguese accents, and collapses separators.
fn normalize_label(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            '_' | '-' | '.' | '/' | '\\' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

const SYNONYMS: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Cnpj, &["cnpj", "cnpj fornecedor"]),
    (
        CanonicalField::RazaoSocial,
        &["razao social", "razao", "fornecedor", "empresa", "supplier"],
    ),
    (
        CanonicalField::NomeFantasia,
        &["nome fantasia", "fantasia", "nome comercial"],
    ),
    (CanonicalField::Endereco, &["endereco", "logradouro"]),
    (
        CanonicalField::ValueTotal,
        &["value total", "valor total", "valor", "valor contrato"],
    ),
    (
        CanonicalField::StartDate,
        &["start date", "data inicio", "inicio", "inicio vigencia"],
    ),
    (
        CanonicalField::EndDate,
        &["end date", "data fim", "fim", "vencimento", "fim vigencia"],
    ),
    (
        CanonicalField::AvisoPrevio,
        &["aviso previo", "aviso", "dias aviso"],
    ),
    (
        CanonicalField::Departamento,
        &["departamento", "depto", "setor"],
    ),
];
