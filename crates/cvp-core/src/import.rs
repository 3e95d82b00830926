//! Import processing: dedup classification and audit-queue seeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cvp_model::{AuditItem, DepartmentId, SourceRecord, cnpj};
use cvp_store::Store;

use crate::auth::AuthContext;
use crate::error::Result;

/// Outcome counts of one processed import batch.
///
/// `queued + duplicates + skipped` always equals the number of rows
/// processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows persisted as pending audit items.
    pub queued: usize,
    /// Rows whose CNPJ already belongs to an Active contract of the
    /// target department.
    pub duplicates: usize,
    /// Rows with no usable CNPJ (or whose write failed).
    pub skipped: usize,
}

impl ImportSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.queued + self.duplicates + self.skipped
    }
}

/// Per-row classification against the Active-contract snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowClass {
    New,
    Duplicate,
    Skipped,
}

fn classify(record: &SourceRecord, active_cnpjs: &std::collections::BTreeSet<String>) -> RowClass {
    let Some(raw) = record.cnpj.as_deref() else {
        return RowClass::Skipped;
    };
    let normalized = cnpj::normalize(raw);
    if normalized.is_empty() {
        return RowClass::Skipped;
    }
    if active_cnpjs.contains(&normalized) {
        return RowClass::Duplicate;
    }
    RowClass::New
}

/// Classifies every projected row and queues the new ones for audit.
///
/// The Active-CNPJ snapshot is taken once, before any row is processed;
/// contracts becoming Active during the batch are not considered. Rows are
/// independent, so classification is order-insensitive and re-running the
/// same input against an unchanged snapshot yields the same summary and
/// the same set of queued records.
pub fn process_import(
    store: &dyn Store,
    records: &[SourceRecord],
    department_id: DepartmentId,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<ImportSummary> {
    let active_cnpjs = store.active_cnpjs(department_id)?;
    debug!(
        department = %department_id,
        snapshot = active_cnpjs.len(),
        rows = records.len(),
        "processing import batch"
    );

    let summary = records.iter().fold(ImportSummary::default(), |mut acc, record| {
        match classify(record, &active_cnpjs) {
            RowClass::Skipped => acc.skipped += 1,
            RowClass::Duplicate => acc.duplicates += 1,
            RowClass::New => {
                let item = AuditItem::pending(record.clone(), department_id, ctx.user_id, now);
                match store.insert_audit_item(item) {
                    Ok(()) => acc.queued += 1,
                    Err(err) => {
                        // A failed row write degrades to a counter, same
                        // as the other per-row outcomes.
                        warn!(error = %err, "audit item write failed; row skipped");
                        acc.skipped += 1;
                    }
                }
            }
        }
        acc
    });

    info!(
        department = %department_id,
        queued = summary.queued,
        duplicates = summary.duplicates,
        skipped = summary.skipped,
        "import batch processed"
    );
    Ok(summary)
}
