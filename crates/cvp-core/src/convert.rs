//! Contract conversion: candidate data in, validated contract out.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use cvp_model::{
    Contract, ContractDraft, ContractId, ContractStatus, SourceRecord, cnpj,
};

use crate::auth::AuthContext;
use crate::error::{CoreError, Result};

/// Best-effort enrichment from the national tax registry.
///
/// Lookups never block contract creation: failures are logged and the
/// draft proceeds unchanged.
pub trait TaxRegistry {
    /// Returns registry data for a normalized CNPJ, or `None` when the
    /// registry has no entry.
    fn lookup(&self, cnpj: &str) -> Result<Option<RegistryEntry>>;
}

/// Supplier data returned by the tax registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryEntry {
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub endereco: Option<String>,
}

/// Registry that never answers; used when enrichment is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl TaxRegistry for NoRegistry {
    fn lookup(&self, _cnpj: &str) -> Result<Option<RegistryEntry>> {
        Ok(None)
    }
}

/// Fills the draft's optional supplier fields from the tax registry.
///
/// Existing values are never overwritten, and a failed lookup leaves the
/// draft untouched.
pub fn enrich_draft(draft: &mut ContractDraft, registry: &dyn TaxRegistry) {
    let normalized = cnpj::normalize(&draft.cnpj);
    match registry.lookup(&normalized) {
        Ok(Some(entry)) => {
            if draft.nome_fantasia.is_none() {
                draft.nome_fantasia = entry.nome_fantasia;
            }
            if draft.endereco.is_none() {
                draft.endereco = entry.endereco;
            }
            if draft.supplier_name.trim().is_empty()
                && let Some(razao) = entry.razao_social
            {
                draft.supplier_name = razao;
            }
        }
        Ok(None) => {}
        Err(err) => warn!(cnpj = %normalized, error = %err, "tax registry lookup failed"),
    }
}

/// Validates a candidate record and materializes a [`Contract`].
///
/// Fails with [`CoreError::Validation`] naming the first unmet
/// requirement; on success the caller's authority decides the initial
/// status (direct activation for admins, otherwise pending approval).
pub fn convert(draft: &ContractDraft, ctx: &AuthContext, now: DateTime<Utc>) -> Result<Contract> {
    if draft.supplier_name.trim().is_empty() {
        return Err(CoreError::Validation {
            field: "supplier_name",
        });
    }
    let normalized = cnpj::normalize(&draft.cnpj);
    if !cnpj::is_valid(&normalized) {
        return Err(CoreError::Validation { field: "cnpj" });
    }
    let department_id = draft.department_id.ok_or(CoreError::Validation {
        field: "department_id",
    })?;
    let value_total = draft.value_total.ok_or(CoreError::Validation {
        field: "value_total",
    })?;
    if !value_total.is_finite() || value_total <= 0.0 {
        return Err(CoreError::Validation {
            field: "value_total",
        });
    }
    let start_date = draft.start_date.ok_or(CoreError::Validation {
        field: "start_date",
    })?;
    let end_date = draft.end_date.ok_or(CoreError::Validation { field: "end_date" })?;
    if start_date > end_date {
        return Err(CoreError::Validation { field: "end_date" });
    }
    if draft.aviso_previo > MAX_AVISO_PREVIO {
        return Err(CoreError::Validation {
            field: "aviso_previo",
        });
    }
    let payment_method = draft.payment_method.ok_or(CoreError::Validation {
        field: "payment_method",
    })?;

    let status = if ctx.can_activate_directly() {
        ContractStatus::Active
    } else {
        ContractStatus::PendingApproval
    };

    Ok(Contract {
        id: ContractId::generate(),
        supplier_name: draft.supplier_name.trim().to_string(),
        cnpj: normalized,
        nome_fantasia: draft.nome_fantasia.clone(),
        endereco: draft.endereco.clone(),
        department_id,
        status,
        value_total,
        start_date,
        end_date,
        aviso_previo: draft.aviso_previo,
        file_url: draft.file_url.clone(),
        created_by: ctx.user_id,
        approver_id: None,
        rejection_reason: None,
        category: draft.category,
        cost_center: draft.cost_center.clone(),
        payment_method,
        adjustment_index: draft.adjustment_index,
        adjustment_base_date: draft.adjustment_base_date,
        auto_renewal: draft.auto_renewal,
        fine_amount: draft.fine_amount,
        has_guarantee: draft.has_guarantee,
        manager_id: draft.manager_id,
        original_proposal_value: draft.original_proposal_value,
        created_at: now,
        updated_at: now,
    })
}

/// Default notice period when the imported row carries none.
const DEFAULT_AVISO_PREVIO: u32 = 30;

/// Largest accepted notice period, in days. Spreadsheet junk parsed as a
/// day count lands far above this.
const MAX_AVISO_PREVIO: u32 = 3650;

/// Builds a draft from an imported source record.
///
/// Cell values are parsed leniently (Brazilian money and date formats);
/// unparseable optional values fall back to absent so validation can name
/// the real gap.
#[must_use]
pub fn draft_from_record(record: &SourceRecord) -> ContractDraft {
    ContractDraft {
        supplier_name: record.razao_social.clone().unwrap_or_default(),
        cnpj: record.cnpj.clone().unwrap_or_default(),
        nome_fantasia: record.nome_fantasia.clone(),
        endereco: record.endereco.clone(),
        department_id: None,
        value_total: record.value_total.as_deref().and_then(parse_money),
        start_date: record.start_date.as_deref().and_then(parse_date),
        end_date: record.end_date.as_deref().and_then(parse_date),
        aviso_previo: record
            .aviso_previo
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_AVISO_PREVIO),
        ..ContractDraft::default()
    }
}

/// Parses monetary cells: `1234.56`, `1.234,56`, `R$ 1.234,56`.
fn parse_money(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_start_matches("R$")
        .replace(' ', "");
    let normalized = if cleaned.contains(',') {
        // Brazilian format: dot is a thousands separator, comma decimal.
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse().ok()
}

/// Parses date cells as ISO (`2025-06-01`) or Brazilian (`01/06/2025`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}
