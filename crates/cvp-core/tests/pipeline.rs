use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use chrono::{NaiveDate, Utc};

use cvp_core::{
    AuthContext, CoreError, convert, convert_audit_item, ignore_audit_item, process_import,
};
use cvp_model::{
    AuditItem, AuditItemId, AuditStatus, CanonicalField, Contract, ContractDraft, ContractId,
    ContractStatus, Department, DepartmentId, Notification, NotificationSettings, PaymentMethod,
    SourceRecord, User, UserId, UserRole,
};
use cvp_store::{MemoryStore, Result as StoreResult, Store, StoreError};

fn admin() -> AuthContext {
    AuthContext::new(UserId::generate(), UserRole::SuperAdmin, None)
}

fn record_with_cnpj(cnpj: &str) -> SourceRecord {
    let mut record = SourceRecord::default();
    record.set(CanonicalField::Cnpj, cnpj);
    record.set(CanonicalField::RazaoSocial, "Fornecedor Teste");
    record.set(CanonicalField::ValueTotal, "1000");
    record
}

fn valid_draft(department_id: DepartmentId, cnpj: &str) -> ContractDraft {
    ContractDraft {
        supplier_name: "Fornecedor Teste".to_string(),
        cnpj: cnpj.to_string(),
        department_id: Some(department_id),
        value_total: Some(1000.0),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        aviso_previo: 30,
        payment_method: Some(PaymentMethod::Boleto),
        ..ContractDraft::default()
    }
}

fn seed_active_contract(store: &MemoryStore, department_id: DepartmentId, cnpj: &str) {
    let contract =
        convert(&valid_draft(department_id, cnpj), &admin(), Utc::now()).expect("convert");
    store.insert_contract(contract).expect("insert");
}

#[test]
fn three_row_import_yields_expected_summary() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    seed_active_contract(&store, dept, "11222333000181");

    let records = vec![
        record_with_cnpj("11.222.333/0001-81"), // already Active in dept
        SourceRecord::default(),                // no cnpj
        record_with_cnpj("11444777000161"),     // new
    ];

    let summary = process_import(&store, &records, dept, &admin(), Utc::now()).expect("import");
    assert_eq!(summary.queued, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total(), records.len());

    let pending = store.pending_audit_items(Some(dept)).expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].source_data.cnpj.as_deref(), Some("11444777000161"));
}

#[test]
fn duplicate_check_is_scoped_to_department() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    let other = DepartmentId::generate();
    seed_active_contract(&store, other, "11222333000181");

    let records = vec![record_with_cnpj("11222333000181")];
    let summary = process_import(&store, &records, dept, &admin(), Utc::now()).expect("import");
    // Same CNPJ in another department is not a duplicate here.
    assert_eq!(summary.queued, 1);
    assert_eq!(summary.duplicates, 0);
}

#[test]
fn rerun_with_unchanged_snapshot_is_deterministic() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    seed_active_contract(&store, dept, "11222333000181");

    let records = vec![
        record_with_cnpj("11222333000181"),
        record_with_cnpj("11444777000161"),
        SourceRecord::default(),
    ];

    let ctx = admin();
    let first = process_import(&store, &records, dept, &ctx, Utc::now()).expect("first");
    let before = store.pending_audit_items(Some(dept)).expect("pending");

    let second = process_import(&store, &records, dept, &ctx, Utc::now()).expect("second");
    let after = store.pending_audit_items(Some(dept)).expect("pending");

    assert_eq!(first, second);
    // The second run queued the same set of records again.
    let mut new_items: Vec<_> = after
        .iter()
        .filter(|item| !before.iter().any(|b| b.id == item.id))
        .map(|item| item.source_data.clone())
        .collect();
    let mut old_items: Vec<_> = before.iter().map(|item| item.source_data.clone()).collect();
    new_items.sort_by(|a, b| a.cnpj.cmp(&b.cnpj));
    old_items.sort_by(|a, b| a.cnpj.cmp(&b.cnpj));
    assert_eq!(new_items, old_items);
}

#[test]
fn audit_item_can_be_acted_on_exactly_once() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    let ctx = admin();

    let records = vec![record_with_cnpj("11444777000161")];
    process_import(&store, &records, dept, &ctx, Utc::now()).expect("import");
    let item = store.pending_audit_items(Some(dept)).expect("pending")[0].clone();

    let ignored = ignore_audit_item(&store, item.id, &ctx, Utc::now()).expect("ignore");
    assert_eq!(ignored.status, AuditStatus::Ignored);
    assert_eq!(ignored.processed_by, Some(ctx.user_id));

    let err = ignore_audit_item(&store, item.id, &ctx, Utc::now()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidStateTransition { .. }));
}

#[test]
fn converting_an_ignored_item_fails_and_leaves_it_ignored() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    let ctx = admin();

    process_import(
        &store,
        &[record_with_cnpj("11444777000161")],
        dept,
        &ctx,
        Utc::now(),
    )
    .expect("import");
    let item = store.pending_audit_items(Some(dept)).expect("pending")[0].clone();
    ignore_audit_item(&store, item.id, &ctx, Utc::now()).expect("ignore");

    let draft = valid_draft(dept, "11444777000161");
    let err = convert_audit_item(&store, item.id, &draft, None, &ctx, Utc::now()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidStateTransition { .. }));

    let unchanged = store.audit_item(item.id).expect("item");
    assert_eq!(unchanged.status, AuditStatus::Ignored);
}

#[test]
fn failed_conversion_leaves_item_pending() {
    let store = MemoryStore::new();
    let dept = DepartmentId::generate();
    let ctx = admin();

    process_import(
        &store,
        &[record_with_cnpj("11444777000161")],
        dept,
        &ctx,
        Utc::now(),
    )
    .expect("import");
    let item = store.pending_audit_items(Some(dept)).expect("pending")[0].clone();

    let mut bad = valid_draft(dept, "11444777000161");
    bad.payment_method = None;
    let err = convert_audit_item(&store, item.id, &bad, None, &ctx, Utc::now()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation {
            field: "payment_method"
        }
    ));
    assert_eq!(
        store.audit_item(item.id).expect("item").status,
        AuditStatus::Pending
    );

    // A corrected payload still goes through.
    let good = valid_draft(dept, "11444777000161");
    let (converted, contract) = convert_audit_item(
        &store,
        item.id,
        &good,
        Some("verified against proposal".to_string()),
        &ctx,
        Utc::now(),
    )
    .expect("convert");
    assert_eq!(converted.status, AuditStatus::Converted);
    assert_eq!(
        converted.processing_notes.as_deref(),
        Some("verified against proposal")
    );
    assert_eq!(contract.cnpj, "11444777000161");
}

/// Store wrapper driving unlucky schedules: an optional rendezvous on
/// audit-item reads and optional contract-write failures.
struct ContentionStore {
    inner: MemoryStore,
    read_gate: Option<Barrier>,
    reject_contract_writes: bool,
}

impl Store for ContentionStore {
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
        self.inner.users_in_department(department_id)
    }
    fn insert_contract(&self, contract: Contract) -> StoreResult<()> {
        if self.reject_contract_writes {
            return Err(StoreError::Io(std::io::Error::other(
                "contract table unavailable",
            )));
        }
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
        if let Some(gate) = &self.read_gate {
            gate.wait();
        }
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
fn concurrent_converts_yield_exactly_one_contract() {
    let dept = DepartmentId::generate();
    let inner = MemoryStore::new();
    process_import(
        &inner,
        &[record_with_cnpj("11444777000161")],
        dept,
        &admin(),
        Utc::now(),
    )
    .expect("import");
    let item_id = inner.pending_audit_items(Some(dept)).expect("pending")[0].id;

    // The gate holds both converters at the pending read, so each
    // observes the item before either has claimed it.
    let store = Arc::new(ContentionStore {
        inner,
        read_gate: Some(Barrier::new(2)),
        reject_contract_writes: false,
    });
    let successes = Arc::new(AtomicUsize::new(0));
    let losers = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let store = Arc::clone(&store);
        let successes = Arc::clone(&successes);
        let losers = Arc::clone(&losers);
        handles.push(std::thread::spawn(move || {
            let ctx = admin();
            let draft = valid_draft(dept, "11444777000161");
            match convert_audit_item(store.as_ref(), item_id, &draft, None, &ctx, Utc::now()) {
                Ok((item, _)) => {
                    assert_eq!(item.status, AuditStatus::Converted);
                    successes.fetch_add(1, Ordering::SeqCst);
                }
                Err(CoreError::InvalidStateTransition { .. }) => {
                    losers.fetch_add(1, Ordering::SeqCst);
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }));
    }
    for handle in handles {
        handle.join().expect("join");
    }

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(losers.load(Ordering::SeqCst), 1);
    // The loser's contract must not leak into the store.
    assert_eq!(
        store
            .contracts_by_status(ContractStatus::Active)
            .expect("contracts")
            .len(),
        1
    );
    // Read past the gate: nobody is left to pair with the barrier.
    assert_eq!(
        store.inner.audit_item(item_id).expect("item").status,
        AuditStatus::Converted
    );
}

#[test]
fn failed_contract_write_rolls_the_item_back() {
    let dept = DepartmentId::generate();
    let inner = MemoryStore::new();
    let ctx = admin();
    process_import(
        &inner,
        &[record_with_cnpj("11444777000161")],
        dept,
        &ctx,
        Utc::now(),
    )
    .expect("import");
    let item_id = inner.pending_audit_items(Some(dept)).expect("pending")[0].id;

    let store = ContentionStore {
        inner,
        read_gate: None,
        reject_contract_writes: true,
    };
    let draft = valid_draft(dept, "11444777000161");
    let err = convert_audit_item(&store, item_id, &draft, None, &ctx, Utc::now()).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));

    // The item is pending again, so a retry against healthy storage works.
    let retried = store.audit_item(item_id).expect("item");
    assert_eq!(retried.status, AuditStatus::Pending);
    assert_eq!(retried.processed_by, None);

    let (converted, contract) =
        convert_audit_item(&store.inner, item_id, &draft, None, &ctx, Utc::now())
            .expect("retry");
    assert_eq!(converted.status, AuditStatus::Converted);
    assert_eq!(contract.cnpj, "11444777000161");
}

mod summary_invariant {
    use proptest::prelude::*;

    use super::*;

    fn arbitrary_record() -> impl Strategy<Value = SourceRecord> {
        prop_oneof![
            Just(SourceRecord::default()),
            Just(record_with_cnpj("11222333000181")),
            Just(record_with_cnpj("11444777000161")),
            Just(record_with_cnpj("12345678000195")),
            Just(record_with_cnpj("n/a")),
            "[0-9]{14}".prop_map(|digits| record_with_cnpj(&digits)),
        ]
    }

    proptest! {
        #[test]
        fn counts_always_sum_to_total(records in prop::collection::vec(arbitrary_record(), 0..40)) {
            let store = MemoryStore::new();
            let dept = DepartmentId::generate();
            seed_active_contract(&store, dept, "11222333000181");

            let summary =
                process_import(&store, &records, dept, &admin(), Utc::now()).expect("import");
            prop_assert_eq!(summary.total(), records.len());
        }
    }
}
