use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use cvp_core::{AuthContext, CoreError, convert, run_reminder_sweep};
use cvp_model::{
    AuditItem, AuditItemId, AuditStatus, Contract, ContractDraft, ContractId, ContractStatus,
    Department, DepartmentId, Notification, NotificationSettings, PaymentMethod, User, UserId,
    UserRole,
};
use cvp_store::{MemoryStore, Result as StoreResult, Store, StoreError};

fn service_ctx() -> AuthContext {
    AuthContext::new(UserId::generate(), UserRole::SuperAdmin, None)
}

fn seed_department(store: &dyn Store) -> DepartmentId {
    let id = DepartmentId::generate();
    store
        .put_department(Department {
            id,
            name: "Compras".to_string(),
            description: None,
        })
        .expect("department");
    id
}

fn seed_user(store: &dyn Store, department_id: DepartmentId, role: UserRole) -> UserId {
    let id = UserId::generate();
    store
        .put_user(User {
            id,
            email: format!("{id}@example.com"),
            full_name: "Usuario".to_string(),
            role,
            department_id: Some(department_id),
            active: true,
        })
        .expect("user");
    id
}

fn seed_active_contract(
    store: &dyn Store,
    department_id: DepartmentId,
    cnpj: &str,
    end_date: NaiveDate,
    aviso_previo: u32,
) -> ContractId {
    let draft = ContractDraft {
        supplier_name: "Fornecedor Teste".to_string(),
        cnpj: cnpj.to_string(),
        department_id: Some(department_id),
        value_total: Some(1000.0),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: Some(end_date),
        aviso_previo,
        payment_method: Some(PaymentMethod::Boleto),
        ..ContractDraft::default()
    };
    let contract = convert(&draft, &service_ctx(), Utc::now()).expect("convert");
    assert_eq!(contract.status, ContractStatus::Active);
    let id = contract.id;
    store.insert_contract(contract).expect("insert");
    id
}

#[test]
fn fires_on_the_exact_trigger_day_only() {
    let store = MemoryStore::new();
    let dept = seed_department(&store);
    let manager = seed_user(&store, dept, UserRole::DepartmentManager);
    // deadline = 2025-06-01 - 30 days = 2025-05-02
    let contract =
        seed_active_contract(&store, dept, "11222333000181", date(2025, 6, 1), 30);

    // 2025-02-01 is exactly 90 days before the deadline.
    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now()).expect("sweep");
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 0);

    let notifications = store.notifications_for_user(manager).expect("notifications");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].contract_id, contract);
    assert_eq!(notifications[0].kind.threshold(), 90);
    assert!(!notifications[0].email_sent);
    assert!(notifications[0].read_at.is_none());
    assert_eq!(
        notifications[0].message,
        "Fornecedor Teste vence em 90 dias"
    );

    // One day later the exact-equality trigger no longer matches.
    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 2), Utc::now()).expect("sweep");
    assert_eq!(summary.created, 0);
    assert_eq!(store.notifications_for_user(manager).expect("n").len(), 1);
}

#[test]
fn same_day_resweeps_are_idempotent() {
    let store = MemoryStore::new();
    let dept = seed_department(&store);
    let manager = seed_user(&store, dept, UserRole::DepartmentManager);
    seed_active_contract(&store, dept, "11222333000181", date(2025, 6, 1), 30);

    for round in 0..5 {
        let summary = run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now())
            .expect("sweep");
        let expected = usize::from(round == 0);
        assert_eq!(summary.created, expected, "round {round}");
    }
    assert_eq!(store.notifications_for_user(manager).expect("n").len(), 1);
}

#[test]
fn respects_recipient_roles_and_settings() {
    let store = MemoryStore::new();
    let dept = seed_department(&store);
    let manager = seed_user(&store, dept, UserRole::DepartmentManager);
    let requester = seed_user(&store, dept, UserRole::Requester);
    let muted = seed_user(&store, dept, UserRole::SuperAdmin);
    store
        .put_notification_settings(NotificationSettings {
            user_id: muted,
            email_enabled: true,
            in_app_enabled: true,
            reminder_days: BTreeSet::from([30]),
        })
        .expect("settings");

    seed_active_contract(&store, dept, "11222333000181", date(2025, 6, 1), 30);
    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now()).expect("sweep");

    // Only the manager with default settings receives the 90-day alert.
    assert_eq!(summary.created, 1);
    assert_eq!(store.notifications_for_user(manager).expect("n").len(), 1);
    assert!(store.notifications_for_user(requester).expect("n").is_empty());
    assert!(store.notifications_for_user(muted).expect("n").is_empty());
}

#[test]
fn inactive_contracts_are_not_swept() {
    let store = MemoryStore::new();
    let dept = seed_department(&store);
    seed_user(&store, dept, UserRole::DepartmentManager);
    let id = seed_active_contract(&store, dept, "11222333000181", date(2025, 6, 1), 30);
    store
        .update_contract_status(id, ContractStatus::Active, &|c| {
            c.status = ContractStatus::Closed;
        })
        .expect("close");

    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now()).expect("sweep");
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.created, 0);
}

#[test]
fn out_of_range_notice_periods_do_not_abort_the_sweep() {
    let store = MemoryStore::new();
    let dept = seed_department(&store);
    let manager = seed_user(&store, dept, UserRole::DepartmentManager);
    seed_active_contract(&store, dept, "11222333000181", date(2025, 6, 1), 30);

    // Junk row from an older snapshot, written past validation.
    store
        .insert_contract(Contract {
            id: ContractId::generate(),
            supplier_name: "Fornecedor Antigo".to_string(),
            cnpj: "11444777000161".to_string(),
            nome_fantasia: None,
            endereco: None,
            department_id: dept,
            status: ContractStatus::Active,
            value_total: 500.0,
            start_date: date(2024, 1, 1),
            end_date: date(2025, 6, 1),
            aviso_previo: u32::MAX,
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
        })
        .expect("insert junk");

    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now()).expect("sweep");
    assert_eq!(summary.processed, 2);
    // The junk contract's saturated deadline matches no threshold; the
    // healthy contract still gets its 90-day reminder.
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(store.notifications_for_user(manager).expect("n").len(), 1);
}

#[test]
fn sweep_requires_elevated_caller() {
    let store = MemoryStore::new();
    let requester = AuthContext::new(UserId::generate(), UserRole::Requester, None);
    let err = run_reminder_sweep(&store, &requester, date(2025, 2, 1), Utc::now()).unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized));
}

/// Store wrapper that fails recipient resolution for one department.
struct FlakyRecipients<S> {
    inner: S,
    broken_department: DepartmentId,
}

impl<S: Store> Store for FlakyRecipients<S> {
    fn put_department(&self, department: Department) -> StoreResult<()> {
        self.inner.put_department(department)
    }
    fn department(&self, id: DepartmentId) -> StoreResult<Department> {
        self.inner.department(id)
    }
    fn departments(&self) -> StoreResult<Vec<Department>> {
        self.inner.departments()
    }
    fn put_user(&self, user: User) -> StoreResult<()> {
        self.inner.put_user(user)
    }
    fn user(&self, id: UserId) -> StoreResult<User> {
        self.inner.user(id)
    }
    fn users_in_department(&self, department_id: DepartmentId) -> StoreResult<Vec<User>> {
        if department_id == self.broken_department {
            return Err(StoreError::NotFound {
                entity: "department users",
                id: department_id.to_string(),
            });
        }
        self.inner.users_in_department(department_id)
    }
    fn insert_contract(&self, contract: Contract) -> StoreResult<()> {
        self.inner.insert_contract(contract)
    }
    fn contract(&self, id: ContractId) -> StoreResult<Contract> {
        self.inner.contract(id)
    }
    fn contracts_by_status(&self, status: ContractStatus) -> StoreResult<Vec<Contract>> {
        self.inner.contracts_by_status(status)
    }
    fn active_cnpjs(&self, department_id: DepartmentId) -> StoreResult<BTreeSet<String>> {
        self.inner.active_cnpjs(department_id)
    }
    fn update_contract_status(
        &self,
        id: ContractId,
        expected: ContractStatus,
        apply: &dyn Fn(&mut Contract),
    ) -> StoreResult<Contract> {
        self.inner.update_contract_status(id, expected, apply)
    }
    fn insert_audit_item(&self, item: AuditItem) -> StoreResult<()> {
        self.inner.insert_audit_item(item)
    }
    fn audit_item(&self, id: AuditItemId) -> StoreResult<AuditItem> {
        self.inner.audit_item(id)
    }
    fn pending_audit_items(
        &self,
        department_id: Option<DepartmentId>,
    ) -> StoreResult<Vec<AuditItem>> {
        self.inner.pending_audit_items(department_id)
    }
    fn update_audit_status(
        &self,
        id: AuditItemId,
        expected: AuditStatus,
        apply: &dyn Fn(&mut AuditItem),
    ) -> StoreResult<AuditItem> {
        self.inner.update_audit_status(id, expected, apply)
    }
    fn notification_settings(&self, user_id: UserId) -> StoreResult<NotificationSettings> {
        self.inner.notification_settings(user_id)
    }
    fn put_notification_settings(&self, settings: NotificationSettings) -> StoreResult<()> {
        self.inner.put_notification_settings(settings)
    }
    fn insert_notification(&self, notification: Notification) -> StoreResult<()> {
        self.inner.insert_notification(notification)
    }
    fn notifications_for_user(&self, user_id: UserId) -> StoreResult<Vec<Notification>> {
        self.inner.notifications_for_user(user_id)
    }
}

#[test]
fn one_contract_failure_does_not_stop_the_sweep() {
    let inner = MemoryStore::new();
    let healthy = seed_department(&inner);
    let broken = seed_department(&inner);
    let manager = seed_user(&inner, healthy, UserRole::DepartmentManager);
    seed_user(&inner, broken, UserRole::DepartmentManager);

    seed_active_contract(&inner, healthy, "11222333000181", date(2025, 6, 1), 30);
    seed_active_contract(&inner, broken, "11444777000161", date(2025, 6, 1), 30);

    let store = FlakyRecipients {
        inner,
        broken_department: broken,
    };
    let summary =
        run_reminder_sweep(&store, &service_ctx(), date(2025, 2, 1), Utc::now()).expect("sweep");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        store.notifications_for_user(manager).expect("n").len(),
        1
    );
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
