//! Contract lifecycle state machine.
//!
//! Transitions: PendingApproval -> {Active, Rejected}, Active -> Closed;
//! Rejected and Closed are terminal. Every transition runs as a
//! compare-and-swap on the observed pre-state, so two concurrent
//! approvers cannot both succeed.

use chrono::{DateTime, Utc};
use tracing::info;

use cvp_model::{Contract, ContractId, ContractStatus};
use cvp_store::{Store, StoreError};

use crate::auth::AuthContext;
use crate::error::{CoreError, Result};

fn map_transition(err: StoreError, attempted: ContractStatus) -> CoreError {
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

fn authorize(store: &dyn Store, id: ContractId, ctx: &AuthContext) -> Result<Contract> {
    let contract = store.contract(id).map_err(CoreError::from_store)?;
    if !ctx.can_approve(contract.department_id) {
        return Err(CoreError::Unauthorized);
    }
    Ok(contract)
}

/// Approves a pending contract, activating it.
pub fn approve_contract(
    store: &dyn Store,
    id: ContractId,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<Contract> {
    authorize(store, id, ctx)?;
    let contract = store
        .update_contract_status(id, ContractStatus::PendingApproval, &|contract| {
            contract.status = ContractStatus::Active;
            contract.approver_id = Some(ctx.user_id);
            contract.updated_at = now;
        })
        .map_err(|err| map_transition(err, ContractStatus::Active))?;
    info!(contract = %id, approver = %ctx.user_id, "contract approved");
    Ok(contract)
}

/// Rejects a pending contract; the reason may be empty.
pub fn reject_contract(
    store: &dyn Store,
    id: ContractId,
    reason: Option<String>,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<Contract> {
    authorize(store, id, ctx)?;
    let contract = store
        .update_contract_status(id, ContractStatus::PendingApproval, &|contract| {
            contract.status = ContractStatus::Rejected;
            contract.approver_id = Some(ctx.user_id);
            contract.rejection_reason = reason.clone();
            contract.updated_at = now;
        })
        .map_err(|err| map_transition(err, ContractStatus::Rejected))?;
    info!(contract = %id, approver = %ctx.user_id, "contract rejected");
    Ok(contract)
}

/// Closes an active contract (manual or externally triggered).
pub fn close_contract(
    store: &dyn Store,
    id: ContractId,
    ctx: &AuthContext,
    now: DateTime<Utc>,
) -> Result<Contract> {
    authorize(store, id, ctx)?;
    let contract = store
        .update_contract_status(id, ContractStatus::Active, &|contract| {
            contract.status = ContractStatus::Closed;
            contract.updated_at = now;
        })
        .map_err(|err| map_transition(err, ContractStatus::Closed))?;
    info!(contract = %id, user = %ctx.user_id, "contract closed");
    Ok(contract)
}
