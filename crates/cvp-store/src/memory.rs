//! In-memory reference implementation of the storage contract.
//!
//! A single mutex guards all tables, so every trait method is atomic with
//! respect to every other. A JSON snapshot keeps CLI state across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cvp_model::{
    AuditItem, AuditItemId, AuditStatus, Contract, ContractId, ContractStatus, Department,
    DepartmentId, Notification, NotificationId, NotificationKind, NotificationSettings, User,
    UserId,
};

use crate::error::{Result, StoreError};
use crate::store::Store;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    departments: BTreeMap<DepartmentId, Department>,
    users: BTreeMap<UserId, User>,
    contracts: BTreeMap<ContractId, Contract>,
    audit_queue: BTreeMap<AuditItemId, AuditItem>,
    notification_settings: BTreeMap<UserId, NotificationSettings>,
    notifications: BTreeMap<NotificationId, Notification>,
    /// Unique index backing the (user, contract, kind) constraint.
    notification_keys: BTreeSet<(UserId, ContractId, NotificationKind)>,
}

/// Mutex-guarded tables implementing [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot from a JSON file, or starts empty when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot, starting empty");
            return Ok(Self::new());
        }
        let bytes = std::fs::read(path)?;
        let tables: Tables = serde_json::from_slice(&bytes)?;
        Ok(Self {
            tables: Mutex::new(tables),
        })
    }

    /// Writes the current tables to a JSON snapshot file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tables = self.lock();
        let bytes = serde_json::to_vec_pretty(&*tables)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Store for MemoryStore {
    fn put_department(&self, department: Department) -> Result<()> {
        self.lock().departments.insert(department.id, department);
        Ok(())
    }

    fn department(&self, id: DepartmentId) -> Result<Department> {
        self.lock()
            .departments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "department",
                id: id.to_string(),
            })
    }

    fn departments(&self) -> Result<Vec<Department>> {
        Ok(self.lock().departments.values().cloned().collect())
    }

    fn put_user(&self, user: User) -> Result<()> {
        self.lock().users.insert(user.id, user);
        Ok(())
    }

    fn user(&self, id: UserId) -> Result<User> {
        self.lock()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                id: id.to_string(),
            })
    }

    fn users_in_department(&self, department_id: DepartmentId) -> Result<Vec<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|user| user.department_id == Some(department_id))
            .cloned()
            .collect())
    }

    fn insert_contract(&self, contract: Contract) -> Result<()> {
        let mut tables = self.lock();
        if tables.contracts.contains_key(&contract.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "contracts_pkey",
                key: contract.id.to_string(),
            });
        }
        tables.contracts.insert(contract.id, contract);
        Ok(())
    }

    fn contract(&self, id: ContractId) -> Result<Contract> {
        self.lock()
            .contracts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "contract",
                id: id.to_string(),
            })
    }

    fn contracts_by_status(&self, status: ContractStatus) -> Result<Vec<Contract>> {
        Ok(self
            .lock()
            .contracts
            .values()
            .filter(|contract| contract.status == status)
            .cloned()
            .collect())
    }

    fn active_cnpjs(&self, department_id: DepartmentId) -> Result<BTreeSet<String>> {
        Ok(self
            .lock()
            .contracts
            .values()
            .filter(|contract| {
                contract.department_id == department_id
                    && contract.status == ContractStatus::Active
            })
            .map(|contract| contract.cnpj.clone())
            .collect())
    }

    fn update_contract_status(
        &self,
        id: ContractId,
        expected: ContractStatus,
        apply: &dyn Fn(&mut Contract),
    ) -> Result<Contract> {
        let mut tables = self.lock();
        let contract = tables
            .contracts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "contract",
                id: id.to_string(),
            })?;
        if contract.status != expected {
            return Err(StoreError::Precondition {
                entity: "contract",
                id: id.to_string(),
                expected: expected.to_string(),
                found: contract.status.to_string(),
            });
        }
        apply(contract);
        Ok(contract.clone())
    }

    fn insert_audit_item(&self, item: AuditItem) -> Result<()> {
        let mut tables = self.lock();
        if tables.audit_queue.contains_key(&item.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "audit_queue_pkey",
                key: item.id.to_string(),
            });
        }
        tables.audit_queue.insert(item.id, item);
        Ok(())
    }

    fn audit_item(&self, id: AuditItemId) -> Result<AuditItem> {
        self.lock()
            .audit_queue
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "audit item",
                id: id.to_string(),
            })
    }

    fn pending_audit_items(&self, department_id: Option<DepartmentId>) -> Result<Vec<AuditItem>> {
        Ok(self
            .lock()
            .audit_queue
            .values()
            .filter(|item| item.status == AuditStatus::Pending)
            .filter(|item| department_id.is_none_or(|dept| item.department_id == dept))
            .cloned()
            .collect())
    }

    fn update_audit_status(
        &self,
        id: AuditItemId,
        expected: AuditStatus,
        apply: &dyn Fn(&mut AuditItem),
    ) -> Result<AuditItem> {
        let mut tables = self.lock();
        let item = tables
            .audit_queue
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "audit item",
                id: id.to_string(),
            })?;
        if item.status != expected {
            return Err(StoreError::Precondition {
                entity: "audit item",
                id: id.to_string(),
                expected: expected.to_string(),
                found: item.status.to_string(),
            });
        }
        apply(item);
        Ok(item.clone())
    }

    fn notification_settings(&self, user_id: UserId) -> Result<NotificationSettings> {
        Ok(self
            .lock()
            .notification_settings
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| NotificationSettings::defaults(user_id)))
    }

    fn put_notification_settings(&self, settings: NotificationSettings) -> Result<()> {
        self.lock()
            .notification_settings
            .insert(settings.user_id, settings);
        Ok(())
    }

    fn insert_notification(&self, notification: Notification) -> Result<()> {
        let mut tables = self.lock();
        let key = (
            notification.user_id,
            notification.contract_id,
            notification.kind,
        );
        if tables.notification_keys.contains(&key) {
            return Err(StoreError::UniqueViolation {
                constraint: "notifications_user_contract_kind_key",
                key: format!("{}/{}/{}", key.0, key.1, key.2),
            });
        }
        tables.notification_keys.insert(key);
        tables.notifications.insert(notification.id, notification);
        Ok(())
    }

    fn notifications_for_user(&self, user_id: UserId) -> Result<Vec<Notification>> {
        Ok(self
            .lock()
            .notifications
            .values()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cvp_model::PaymentMethod;

    use super::*;

    fn contract(department_id: DepartmentId, status: ContractStatus, cnpj: &str) -> Contract {
        Contract {
            id: ContractId::generate(),
            supplier_name: "Fornecedor".to_string(),
            cnpj: cnpj.to_string(),
            nome_fantasia: None,
            endereco: None,
            department_id,
            status,
            value_total: 1200.0,
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            aviso_previo: 30,
            file_url: None,
            created_by: UserId::generate(),
            approver_id: None,
            rejection_reason: None,
            category: None,
            cost_center: None,
            payment_method: PaymentMethod::Boleto,
            adjustment_index: None,
            adjustment_base_date: None,
            auto_renewal: false,
            fine_amount: 0.0,
            has_guarantee: false,
            manager_id: None,
            original_proposal_value: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_cnpjs_filters_department_and_status() {
        let store = MemoryStore::new();
        let dept = DepartmentId::generate();
        let other = DepartmentId::generate();
        store
            .insert_contract(contract(dept, ContractStatus::Active, "11222333000181"))
            .unwrap();
        store
            .insert_contract(contract(dept, ContractStatus::Closed, "11444777000161"))
            .unwrap();
        store
            .insert_contract(contract(other, ContractStatus::Active, "12345678000195"))
            .unwrap();

        let cnpjs = store.active_cnpjs(dept).unwrap();
        assert_eq!(cnpjs, BTreeSet::from(["11222333000181".to_string()]));
    }

    #[test]
    fn contract_cas_rejects_stale_expectation() {
        let store = MemoryStore::new();
        let dept = DepartmentId::generate();
        let row = contract(dept, ContractStatus::PendingApproval, "11222333000181");
        let id = row.id;
        store.insert_contract(row).unwrap();

        let updated = store
            .update_contract_status(id, ContractStatus::PendingApproval, &|c| {
                c.status = ContractStatus::Active;
            })
            .unwrap();
        assert_eq!(updated.status, ContractStatus::Active);

        let err = store
            .update_contract_status(id, ContractStatus::PendingApproval, &|c| {
                c.status = ContractStatus::Rejected;
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Precondition { .. }));
    }

    #[test]
    fn notification_triple_is_unique() {
        let store = MemoryStore::new();
        let user = UserId::generate();
        let contract_id = ContractId::generate();
        let row = Notification {
            id: NotificationId::generate(),
            user_id: user,
            kind: NotificationKind::Reminder90,
            contract_id,
            message: "Fornecedor vence em 90 dias".to_string(),
            email_sent: false,
            read_at: None,
            created_at: Utc::now(),
        };
        store.insert_notification(row.clone()).unwrap();

        let mut duplicate = row;
        duplicate.id = NotificationId::generate();
        let err = store.insert_notification(duplicate).unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
        assert_eq!(store.notifications_for_user(user).unwrap().len(), 1);
    }

    #[test]
    fn settings_default_when_absent() {
        let store = MemoryStore::new();
        let user = UserId::generate();
        let settings = store.notification_settings(user).unwrap();
        assert_eq!(settings, NotificationSettings::defaults(user));
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryStore::new();
        let dept = DepartmentId::generate();
        store
            .put_department(Department {
                id: dept,
                name: "Compras".to_string(),
                description: None,
            })
            .unwrap();
        store
            .insert_contract(contract(dept, ContractStatus::Active, "11222333000181"))
            .unwrap();
        store.save(&path).unwrap();

        let reloaded = MemoryStore::load(&path).unwrap();
        assert_eq!(reloaded.departments().unwrap().len(), 1);
        assert_eq!(
            reloaded
                .contracts_by_status(ContractStatus::Active)
                .unwrap()
                .len(),
            1
        );
    }
}
