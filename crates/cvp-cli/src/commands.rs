//! Command implementations over the snapshot store.
//!
//! Every mutating command follows the same shape: open the snapshot, run
//! the core operation, commit the snapshot back. Reads skip the commit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use cvp_core::{
    AuthContext, ImportSummary, ImportWizard, SweepSummary, approve_contract, close_contract,
    convert_audit_item, ignore_audit_item, process_import, reject_contract, run_reminder_sweep,
};
use cvp_map::{ColumnMapping, MappingSuggestion};
use cvp_model::{
    AuditItem, AuditItemId, Contract, ContractDraft, ContractId, ContractStatus, Department,
    DepartmentId, User, UserId, UserRole,
};
use cvp_store::{MemoryStore, Store};

use crate::cli::{ImportArgs, SuggestArgs, SweepArgs};

/// A loaded snapshot plus the path to commit it back to.
struct StoreHandle {
    store: MemoryStore,
    path: PathBuf,
}

impl StoreHandle {
    fn open(path: &Path) -> Result<Self> {
        let store = MemoryStore::load(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?;
        Ok(Self {
            store,
            path: path.to_path_buf(),
        })
    }

    fn commit(&self) -> Result<()> {
        self.store
            .save(&self.path)
            .with_context(|| format!("failed to write snapshot {}", self.path.display()))
    }
}

/// Resolves the acting identity.
///
/// With `--as-user` the stored account supplies role and department;
/// otherwise a throwaway service admin context is used.
fn auth_context(store: &MemoryStore, as_user: Option<UserId>) -> Result<AuthContext> {
    match as_user {
        Some(id) => {
            let user = store.user(id)?;
            anyhow::ensure!(user.active, "user {id} is deactivated");
            Ok(AuthContext::new(user.id, user.role, user.department_id))
        }
        None => Ok(AuthContext::new(
            UserId::generate(),
            UserRole::SuperAdmin,
            None,
        )),
    }
}

fn ingest_file(path: &Path, header_row: Option<usize>) -> Result<cvp_ingest::RawTable> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("file name is not valid UTF-8")?;
    let mut table = cvp_ingest::ingest(&bytes, file_name)?;
    if let Some(index) = header_row {
        table.select_header_row(index)?;
    }
    Ok(table)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("{} {} is not valid JSON", what, path.display()))
}

/// Runs the whole import flow for one file and commits the snapshot.
pub fn run_import(
    store_path: &Path,
    as_user: Option<UserId>,
    args: &ImportArgs,
) -> Result<ImportSummary> {
    let handle = StoreHandle::open(store_path)?;
    // Fail before touching the wizard when the department is unknown.
    handle.store.department(args.department)?;
    let ctx = auth_context(&handle.store, as_user)?;

    let table = ingest_file(&args.file, None)?;
    let mut wizard = ImportWizard::new();
    wizard.upload(table)?;
    if let Some(index) = args.header_row {
        wizard.select_header_row(index)?;
    }

    let mapping: ColumnMapping = match &args.mapping {
        Some(path) => read_json(path, "mapping")?,
        None => {
            let table = wizard.table().context("upload left no table behind")?;
            let suggestions = cvp_map::suggest(table.headers());
            info!(suggested = suggestions.len(), "no mapping given, using suggestions");
            cvp_map::to_mapping(&suggestions)
        }
    };
    wizard.confirm_mapping(mapping)?;
    wizard.choose_department(args.department)?;

    let table = wizard.table().context("upload left no table behind")?;
    let records = cvp_map::project(table, wizard.mapping());
    let summary = process_import(&handle.store, &records, args.department, &ctx, Utc::now())?;
    wizard.record_summary(summary)?;

    handle.commit()?;
    Ok(summary)
}

/// Ingests a file and reports mapping suggestions without writing anything.
pub fn run_suggest(args: &SuggestArgs) -> Result<Vec<MappingSuggestion>> {
    let table = ingest_file(&args.file, args.header_row)?;
    Ok(cvp_map::suggest(table.headers()))
}

pub fn run_audit_list(
    store_path: &Path,
    department: Option<DepartmentId>,
) -> Result<Vec<AuditItem>> {
    let handle = StoreHandle::open(store_path)?;
    Ok(handle.store.pending_audit_items(department)?)
}

pub fn run_audit_ignore(
    store_path: &Path,
    as_user: Option<UserId>,
    item: AuditItemId,
) -> Result<AuditItem> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let item = ignore_audit_item(&handle.store, item, &ctx, Utc::now())?;
    handle.commit()?;
    Ok(item)
}

pub fn run_audit_convert(
    store_path: &Path,
    as_user: Option<UserId>,
    item: AuditItemId,
    draft_path: &Path,
    notes: Option<String>,
) -> Result<(AuditItem, Contract)> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let draft: ContractDraft = read_json(draft_path, "draft")?;
    let outcome = convert_audit_item(&handle.store, item, &draft, notes, &ctx, Utc::now())?;
    handle.commit()?;
    Ok(outcome)
}

pub fn run_contract_list(store_path: &Path, status: ContractStatus) -> Result<Vec<Contract>> {
    let handle = StoreHandle::open(store_path)?;
    Ok(handle.store.contracts_by_status(status)?)
}

pub fn run_contract_approve(
    store_path: &Path,
    as_user: Option<UserId>,
    contract: ContractId,
) -> Result<Contract> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let contract = approve_contract(&handle.store, contract, &ctx, Utc::now())?;
    handle.commit()?;
    Ok(contract)
}

pub fn run_contract_reject(
    store_path: &Path,
    as_user: Option<UserId>,
    contract: ContractId,
    reason: Option<String>,
) -> Result<Contract> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let contract = reject_contract(&handle.store, contract, reason, &ctx, Utc::now())?;
    handle.commit()?;
    Ok(contract)
}

pub fn run_contract_close(
    store_path: &Path,
    as_user: Option<UserId>,
    contract: ContractId,
) -> Result<Contract> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let contract = close_contract(&handle.store, contract, &ctx, Utc::now())?;
    handle.commit()?;
    Ok(contract)
}

pub fn run_sweep(
    store_path: &Path,
    as_user: Option<UserId>,
    args: &SweepArgs,
) -> Result<SweepSummary> {
    let handle = StoreHandle::open(store_path)?;
    let ctx = auth_context(&handle.store, as_user)?;
    let now = Utc::now();
    let today = args.today.unwrap_or_else(|| now.date_naive());
    let summary = run_reminder_sweep(&handle.store, &ctx, today, now)?;
    handle.commit()?;
    Ok(summary)
}

pub fn run_department_add(
    store_path: &Path,
    name: String,
    description: Option<String>,
) -> Result<Department> {
    let handle = StoreHandle::open(store_path)?;
    let department = Department {
        id: DepartmentId::generate(),
        name,
        description,
    };
    handle.store.put_department(department.clone())?;
    handle.commit()?;
    Ok(department)
}

pub fn run_department_list(store_path: &Path) -> Result<Vec<Department>> {
    let handle = StoreHandle::open(store_path)?;
    Ok(handle.store.departments()?)
}

pub fn run_user_add(
    store_path: &Path,
    email: String,
    full_name: String,
    role: UserRole,
    department: Option<DepartmentId>,
) -> Result<User> {
    let handle = StoreHandle::open(store_path)?;
    if let Some(id) = department {
        handle.store.department(id)?;
    }
    let user = User {
        id: UserId::generate(),
        email,
        full_name,
        role,
        department_id: department,
        active: true,
    };
    handle.store.put_user(user.clone())?;
    handle.commit()?;
    Ok(user)
}
