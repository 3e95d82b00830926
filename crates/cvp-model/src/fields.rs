//! The canonical contract-field enumeration and the tagged source record.
//!
//! Imported rows carry at most one value per canonical field. The record is
//! shaped at mapping time, so downstream consumers never see free-form
//! column labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// The fixed set of fields a source column may be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Cnpj,
    RazaoSocial,
    NomeFantasia,
    Endereco,
    ValueTotal,
    StartDate,
    EndDate,
    AvisoPrevio,
    Departamento,
}

impl CanonicalField {
    /// All canonical fields in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Cnpj,
        Self::RazaoSocial,
        Self::NomeFantasia,
        Self::Endereco,
        Self::ValueTotal,
        Self::StartDate,
        Self::EndDate,
        Self::AvisoPrevio,
        Self::Departamento,
    ];

    /// Fields the import wizard requires before a mapping is usable.
    pub const REQUIRED: [Self; 3] = [Self::Cnpj, Self::RazaoSocial, Self::ValueTotal];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cnpj => "cnpj",
            Self::RazaoSocial => "razao_social",
            Self::NomeFantasia => "nome_fantasia",
            Self::Endereco => "endereco",
            Self::ValueTotal => "value_total",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::AvisoPrevio => "aviso_previo",
            Self::Departamento => "departamento",
        }
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cnpj" => Ok(Self::Cnpj),
            "razao_social" => Ok(Self::RazaoSocial),
            "nome_fantasia" => Ok(Self::NomeFantasia),
            "endereco" => Ok(Self::Endereco),
            "value_total" => Ok(Self::ValueTotal),
            "start_date" => Ok(Self::StartDate),
            "end_date" => Ok(Self::EndDate),
            "aviso_previo" => Ok(Self::AvisoPrevio),
            "departamento" => Ok(Self::Departamento),
            other => Err(ModelError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One imported row projected onto the canonical fields.
///
/// Every field is optional; values are the raw cell strings, validated only
/// when the record is converted into a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aviso_previo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento: Option<String>,
}

impl SourceRecord {
    /// Stores `value` under `field`, overwriting any previous value.
    ///
    /// Empty and whitespace-only cells are treated as absent.
    pub fn set(&mut self, field: CanonicalField, value: &str) {
        let trimmed = value.trim();
        let slot = self.slot_mut(field);
        *slot = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Cnpj => self.cnpj.as_deref(),
            CanonicalField::RazaoSocial => self.razao_social.as_deref(),
            CanonicalField::NomeFantasia => self.nome_fantasia.as_deref(),
            CanonicalField::Endereco => self.endereco.as_deref(),
            CanonicalField::ValueTotal => self.value_total.as_deref(),
            CanonicalField::StartDate => self.start_date.as_deref(),
            CanonicalField::EndDate => self.end_date.as_deref(),
            CanonicalField::AvisoPrevio => self.aviso_previo.as_deref(),
            CanonicalField::Departamento => self.departamento.as_deref(),
        }
    }

    /// True when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        CanonicalField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<String> {
        match field {
            CanonicalField::Cnpj => &mut self.cnpj,
            CanonicalField::RazaoSocial => &mut self.razao_social,
            CanonicalField::NomeFantasia => &mut self.nome_fantasia,
            CanonicalField::Endereco => &mut self.endereco,
            CanonicalField::ValueTotal => &mut self.value_total,
            CanonicalField::StartDate => &mut self.start_date,
            CanonicalField::EndDate => &mut self.end_date,
            CanonicalField::AvisoPrevio => &mut self.aviso_previo,
            CanonicalField::Departamento => &mut self.departamento,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in CanonicalField::ALL {
            let parsed: CanonicalField = field.as_str().parse().expect("parse field");
            assert_eq!(parsed, field);
        }
        assert!("supplier".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn set_trims_and_drops_empty_cells() {
        let mut record = SourceRecord::default();
        record.set(CanonicalField::Cnpj, "  11222333000181  ");
        assert_eq!(record.get(CanonicalField::Cnpj), Some("11222333000181"));

        record.set(CanonicalField::Cnpj, "   ");
        assert_eq!(record.get(CanonicalField::Cnpj), None);
        assert!(record.is_empty());
    }

    #[test]
    fn later_set_overwrites() {
        let mut record = SourceRecord::default();
        record.set(CanonicalField::RazaoSocial, "Fornecedor A");
        record.set(CanonicalField::RazaoSocial, "Fornecedor B");
        assert_eq!(record.get(CanonicalField::RazaoSocial), Some("Fornecedor B"));
    }
}
