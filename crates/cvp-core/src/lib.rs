//! Core of the contract ingestion and lifecycle pipeline.
//!
//! Ties the leaf crates together: projected records flow through dedup
//! classification into the audit queue, triage converts them into governed
//! contracts, the state machine guards approvals, and the reminder sweep
//! emits at-most-one notification per (user, contract, threshold).

#![deny(unsafe_code)]

mod audit;
mod auth;
mod convert;
mod error;
mod import;
mod reminder;
mod state;
mod wizard;

pub use audit::{convert_audit_item, ignore_audit_item};
pub use auth::AuthContext;
pub use convert::{
    NoRegistry, RegistryEntry, TaxRegistry, convert, draft_from_record, enrich_draft,
};
pub use error::{CoreError, Result};
pub use import::{ImportSummary, process_import};
pub use reminder::{REMINDER_THRESHOLDS, SweepSummary, run_reminder_sweep};
pub use state::{approve_contract, close_contract, reject_contract};
pub use wizard::{ImportWizard, WizardStep};
