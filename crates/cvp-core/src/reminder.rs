//! Scheduled deadline-reminder sweep.
//!
//! Re-entrant and idempotent: the storage-level uniqueness of the
//! (user, contract, kind) triple guarantees at-most-one notification per
//! threshold even when sweeps overlap.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cvp_model::{
    Contract, ContractStatus, Notification, NotificationId, NotificationKind,
};
use cvp_store::{Store, StoreError};

use crate::auth::AuthContext;
use crate::error::{CoreError, Result};

/// The global reminder thresholds, in days before the notice deadline.
pub const REMINDER_THRESHOLDS: [u32; 3] = [90, 60, 30];

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Active contracts examined.
    pub processed: usize,
    /// Notifications created this sweep.
    pub created: usize,
    /// Contracts whose recipient resolution or writes failed.
    pub failed: usize,
}

/// Runs one reminder sweep over every Active contract.
///
/// A contract triggers a threshold only on the single calendar day where
/// the whole-day count until its notice deadline matches exactly. One
/// contract's failure never aborts the sweep for the others.
pub fn run_reminder_sweep(
    store: &dyn Store,
    ctx: &AuthContext,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<SweepSummary> {
    if !ctx.is_elevated() {
        return Err(CoreError::Unauthorized);
    }

    let contracts = store.contracts_by_status(ContractStatus::Active)?;
    let mut summary = SweepSummary::default();

    for contract in &contracts {
        summary.processed += 1;
        match sweep_contract(store, contract, today, now) {
            Ok(created) => summary.created += created,
            Err(err) => {
                warn!(contract = %contract.id, error = %err, "reminder sweep failed for contract");
                summary.failed += 1;
            }
        }
    }

    debug!(
        processed = summary.processed,
        created = summary.created,
        failed = summary.failed,
        "reminder sweep finished"
    );
    Ok(summary)
}

fn sweep_contract(
    store: &dyn Store,
    contract: &Contract,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<usize> {
    let deadline = contract.notice_deadline();
    let days_until = (deadline - today).num_days();
    let mut created = 0usize;

    for kind in [
        NotificationKind::Reminder90,
        NotificationKind::Reminder60,
        NotificationKind::Reminder30,
    ] {
        let threshold = kind.threshold();
        if days_until != i64::from(threshold) {
            continue;
        }

        let recipients = store.users_in_department(contract.department_id)?;
        for user in recipients
            .iter()
            .filter(|user| user.active && user.role.is_elevated())
        {
            let settings = store.notification_settings(user.id)?;
            if !settings.wants(threshold) {
                continue;
            }
            let notification = Notification {
                id: NotificationId::generate(),
                user_id: user.id,
                kind,
                contract_id: contract.id,
                message: format!("{} vence em {} dias", contract.supplier_name, threshold),
                email_sent: false,
                read_at: None,
                created_at: now,
            };
            match store.insert_notification(notification) {
                Ok(()) => created += 1,
                // Already delivered for this triple, possibly by a
                // concurrent sweep; not a failure.
                Err(StoreError::UniqueViolation { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(created)
}
