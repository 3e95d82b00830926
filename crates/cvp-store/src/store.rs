//! The narrow storage contract consumed by the pipeline.

use std::collections::BTreeSet;

use cvp_model::{
    AuditItem, AuditItemId, AuditStatus, Contract, ContractId, ContractStatus, Department,
    DepartmentId, Notification, NotificationSettings, User, UserId,
};

use crate::error::Result;

/// Filtered reads and atomic single-row writes over the core tables.
///
/// Implementations must make each method atomic with respect to every
/// other method: the compare-and-swap updates observe and mutate status
/// under the same critical section, and `insert_notification` enforces the
/// uniqueness of (user, contract, kind) as a storage-level constraint.
pub trait Store: Send + Sync {
    // --- departments / users ---
    fn put_department(&self, department: Department) -> Result<()>;
    fn department(&self, id: DepartmentId) -> Result<Department>;
    fn departments(&self) -> Result<Vec<Department>>;
    fn put_user(&self, user: User) -> Result<()>;
    fn user(&self, id: UserId) -> Result<User>;
    fn users_in_department(&self, department_id: DepartmentId) -> Result<Vec<User>>;

    // --- contracts ---
    fn insert_contract(&self, contract: Contract) -> Result<()>;
    fn contract(&self, id: ContractId) -> Result<Contract>;
    fn contracts_by_status(&self, status: ContractStatus) -> Result<Vec<Contract>>;
    /// Normalized CNPJs of the department's currently Active contracts.
    fn active_cnpjs(&self, department_id: DepartmentId) -> Result<BTreeSet<String>>;
    /// Applies `apply` to the contract only if its status still equals
    /// `expected`; fails with [`StoreError::Precondition`] otherwise.
    ///
    /// [`StoreError::Precondition`]: crate::StoreError::Precondition
    fn update_contract_status(
        &self,
        id: ContractId,
        expected: ContractStatus,
        apply: &dyn Fn(&mut Contract),
    ) -> Result<Contract>;

    // --- audit queue ---
    fn insert_audit_item(&self, item: AuditItem) -> Result<()>;
    fn audit_item(&self, id: AuditItemId) -> Result<AuditItem>;
    fn pending_audit_items(&self, department_id: Option<DepartmentId>) -> Result<Vec<AuditItem>>;
    /// Compare-and-swap counterpart of [`Store::update_contract_status`]
    /// for audit items.
    fn update_audit_status(
        &self,
        id: AuditItemId,
        expected: AuditStatus,
        apply: &dyn Fn(&mut AuditItem),
    ) -> Result<AuditItem>;

    // --- notifications ---
    /// Settings for a user, falling back to defaults when none stored.
    fn notification_settings(&self, user_id: UserId) -> Result<NotificationSettings>;
    fn put_notification_settings(&self, settings: NotificationSettings) -> Result<()>;
    /// Inserts a notification, failing with a unique violation when a row
    /// for the same (user, contract, kind) triple already exists.
    fn insert_notification(&self, notification: Notification) -> Result<()>;
    fn notifications_for_user(&self, user_id: UserId) -> Result<Vec<Notification>>;
}
