//! Audit-queue records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::AuditStatus;
use crate::fields::SourceRecord;
use crate::ids::{AuditItemId, DepartmentId, UserId};

/// An imported row awaiting human triage.
///
/// Once the item leaves `Pending` it is a historical record only; the
/// status is write-once after that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditItem {
    pub id: AuditItemId,
    pub source_data: SourceRecord,
    pub status: AuditStatus,
    pub department_id: DepartmentId,
    pub imported_by: UserId,
    pub import_date: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<UserId>,
    pub processing_notes: Option<String>,
}

impl AuditItem {
    /// Creates a fresh pending item for an imported row.
    #[must_use]
    pub fn pending(
        source_data: SourceRecord,
        department_id: DepartmentId,
        imported_by: UserId,
        import_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditItemId::generate(),
            source_data,
            status: AuditStatus::Pending,
            department_id,
            imported_by,
            import_date,
            processed_at: None,
            processed_by: None,
            processing_notes: None,
        }
    }
}
