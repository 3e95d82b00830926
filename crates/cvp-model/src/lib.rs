//! Data model for the contract ingestion and lifecycle pipeline.
//!
//! Everything here is plain data: typed identifiers, status enumerations,
//! the canonical-field record produced by column mapping, and the contract,
//! audit-queue, notification, user, and department rows held by the store.

#![deny(unsafe_code)]

pub mod cnpj;

mod audit;
mod contract;
mod enums;
mod error;
mod fields;
mod ids;
mod notification;
mod people;

pub use audit::AuditItem;
pub use contract::{Contract, ContractDraft};
pub use enums::{
    AdjustmentIndex, AuditStatus, Category, ContractStatus, NotificationKind, PaymentMethod,
    UserRole,
};
pub use error::{ModelError, Result};
pub use fields::{CanonicalField, SourceRecord};
pub use ids::{AuditItemId, ContractId, DepartmentId, NotificationId, UserId};
pub use notification::{Notification, NotificationSettings};
pub use people::{Department, User};
