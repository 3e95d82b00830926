//! Status and category enumerations.
//!
//! Wire names preserve the legacy Portuguese strings stored by the
//! original system so that exported snapshots stay readable against
//! historical data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Lifecycle status of a governed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "Pendente Aprovacao")]
    PendingApproval,
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Encerrado")]
    Closed,
    #[serde(rename = "Rejeitado")]
    Rejected,
}

impl ContractStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Pendente Aprovacao",
            Self::Active => "Ativo",
            Self::Closed => "Encerrado",
            Self::Rejected => "Rejeitado",
        }
    }

    /// True when no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Rejected)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage status of an audit-queue item.
///
/// `Pending` is the only state with outgoing transitions; `Ignored` and
/// `Converted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Ignorado")]
    Ignored,
    #[serde(rename = "Convertido")]
    Converted,
}

impl AuditStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Ignored => "Ignorado",
            Self::Converted => "Convertido",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Super Admin")]
    SuperAdmin,
    #[serde(rename = "Gestor de Departamento")]
    DepartmentManager,
    #[serde(rename = "Solicitante")]
    Requester,
}

impl UserRole {
    /// Roles that receive deadline reminders and may triage contracts.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::DepartmentManager)
    }
}

/// Commercial category of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Serviço")]
    Servico,
    #[serde(rename = "Produto")]
    Produto,
    #[serde(rename = "Locação")]
    Locacao,
}

/// Payment method agreed with the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Boleto")]
    Boleto,
    #[serde(rename = "Transferência")]
    Transferencia,
}

/// Price adjustment index referenced by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentIndex {
    #[serde(rename = "IPCA")]
    Ipca,
    #[serde(rename = "IGPM")]
    Igpm,
    #[serde(rename = "INPC")]
    Inpc,
    #[serde(rename = "Outro")]
    Outro,
}

/// Kind of deadline-reminder notification.
///
/// One kind per reminder threshold; the (user, contract, kind) triple is
/// unique for the lifetime of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "contract_reminder_90")]
    Reminder90,
    #[serde(rename = "contract_reminder_60")]
    Reminder60,
    #[serde(rename = "contract_reminder_30")]
    Reminder30,
}

impl NotificationKind {
    /// Maps a day-count threshold to its reminder kind.
    pub fn from_threshold(days: u32) -> Result<Self, ModelError> {
        match days {
            90 => Ok(Self::Reminder90),
            60 => Ok(Self::Reminder60),
            30 => Ok(Self::Reminder30),
            other => Err(ModelError::UnknownThreshold(other)),
        }
    }

    /// The day-count threshold this kind represents.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        match self {
            Self::Reminder90 => 90,
            Self::Reminder60 => 60,
            Self::Reminder30 => 30,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder90 => "contract_reminder_90",
            Self::Reminder60 => "contract_reminder_60",
            Self::Reminder30 => "contract_reminder_30",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
