//! Audit-queue triage: ignore or convert pending items.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use cvp_model::{AuditItem, AuditItemId, AuditStatus, Contract, ContractDraft};
use cvp_store::{Store, StoreError};

use crate::auth::AuthContext;
use crate::convert;
use crate::error::{CoreError, Result};

fn map_transition(err: StoreError, attempted: AuditStatus) -> CoreError {
    match err {
        StoreError::Precondition { entity, id, found, .. } => CoreError::InvalidStateTransition {
            entity,
            id,
            from: found,
            attempted: attempted.to_string(),
        },
        other => CoreError::from_store(other),
    }
}

/// Marks a pending item as ignored.
///
/// Legal only from `Pending`; `Ignored` is terminal.
pub fn ignore_audit_item(
    store: &dyn Store,
    id: AuditItemId,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<AuditItem> {
    let item = store
        .update_audit_status(id, AuditStatus::Pending, &|item| {
            item.status = AuditStatus::Ignored;
            item.processed_by = Some(ctx.user_id);
            item.processed_at = Some(now);
        })
        .map_err(|err| map_transition(err, AuditStatus::Ignored))?;
    info!(item = %id, user = %ctx.user_id, "audit item ignored");
    Ok(item)
}

/// Converts a pending item into a governed contract.
///
/// The payload is validated first; on any converter failure the item's
/// status is unchanged. The compare-and-swap to `Converted` runs before
/// the contract write and arbitrates exactly-once between concurrent
/// converts: only the winner inserts a contract. A failed contract write
/// rolls the item back to `Pending` so the conversion can be retried.
pub fn convert_audit_item(
    store: &dyn Store,
    id: AuditItemId,
    draft: &ContractDraft,
    notes: Option<String>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<(AuditItem, Contract)> {
    let item = store.audit_item(id).map_err(CoreError::from_store)?;
    if item.status != AuditStatus::Pending {
        return Err(CoreError::InvalidStateTransition {
            entity: "audit item",
            id: id.to_string(),
            from: item.status.to_string(),
            attempted: AuditStatus::Converted.to_string(),
        });
    }

    // Validation happens before any write; a rejected payload leaves the
    // item pending.
    let contract = convert::convert(draft, ctx, now)?;

    let item = store
        .update_audit_status(id, AuditStatus::Pending, &|item| {
            item.status = AuditStatus::Converted;
            item.processed_by = Some(ctx.user_id);
            item.processed_at = Some(now);
            item.processing_notes = notes.clone();
        })
        .map_err(|err| map_transition(err, AuditStatus::Converted))?;

    if let Err(err) = store.insert_contract(contract.clone()) {
        if let Err(rollback_err) = store.update_audit_status(id, AuditStatus::Converted, &|item| {
            item.status = AuditStatus::Pending;
            item.processed_by = None;
            item.processed_at = None;
            item.processing_notes = None;
        }) {
            warn!(item = %id, error = %rollback_err, "rollback to pending failed");
        }
        return Err(CoreError::from_store(err));
    }

    info!(item = %id, contract = %contract.id, "audit item converted");
    Ok((item, contract))
}
