//! Governed contract records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AdjustmentIndex, Category, ContractStatus, PaymentMethod};
use crate::ids::{ContractId, DepartmentId, UserId};

/// A governed contract owned by a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub supplier_name: String,
    /// Normalized 14-digit CNPJ.
    pub cnpj: String,
    pub nome_fantasia: Option<String>,
    pub endereco: Option<String>,
    pub department_id: DepartmentId,
    pub status: ContractStatus,
    pub value_total: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Notice period in days; the action deadline is `end_date - aviso_previo`.
    pub aviso_previo: u32,
    pub file_url: Option<String>,
    pub created_by: UserId,
    pub approver_id: Option<UserId>,
    pub rejection_reason: Option<String>,
    pub category: Option<Category>,
    pub cost_center: Option<String>,
    pub payment_method: PaymentMethod,
    pub adjustment_index: Option<AdjustmentIndex>,
    pub adjustment_base_date: Option<NaiveDate>,
    pub auto_renewal: bool,
    pub fine_amount: f64,
    pub has_guarantee: bool,
    pub manager_id: Option<UserId>,
    pub original_proposal_value: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// The date by which notice must be given.
    ///
    /// Saturates at the calendar floor for out-of-range notice periods,
    /// so stored junk never panics date arithmetic downstream.
    #[must_use]
    pub fn notice_deadline(&self) -> NaiveDate {
        self.end_date
            .checked_sub_days(chrono::Days::new(u64::from(self.aviso_previo)))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Candidate data for a contract, prior to validation.
///
/// Produced either from an audit item's source record or from a direct
/// submission; `ContractConverter` turns it into a [`Contract`] or rejects
/// it with the first unmet requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractDraft {
    pub supplier_name: String,
    pub cnpj: String,
    pub nome_fantasia: Option<String>,
    pub endereco: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub value_total: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub aviso_previo: u32,
    pub file_url: Option<String>,
    pub category: Option<Category>,
    pub cost_center: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub adjustment_index: Option<AdjustmentIndex>,
    pub adjustment_base_date: Option<NaiveDate>,
    pub auto_renewal: bool,
    pub fine_amount: f64,
    pub has_guarantee: bool,
    pub manager_id: Option<UserId>,
    pub original_proposal_value: Option<f64>,
}
