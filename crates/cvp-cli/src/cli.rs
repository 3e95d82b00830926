//! CLI argument definitions for the contract pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cvp_model::{AuditItemId, ContractId, ContractStatus, DepartmentId, UserId, UserRole};

#[derive(Parser)]
#[command(
    name = "cvp",
    version,
    about = "Contract vendor pipeline - import spreadsheets, triage the audit queue, govern contracts",
    long_about = "Import supplier contract spreadsheets (CSV/XLSX), triage imported rows\n\
                  through the audit queue, drive the contract approval lifecycle, and run\n\
                  the deadline-reminder sweep.\n\n\
                  State lives in a JSON snapshot selected with --store."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON snapshot holding pipeline state.
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = "cvp-store.json",
        global = true
    )]
    pub store: PathBuf,

    /// Act as this user; defaults to a service admin context.
    #[arg(long = "as-user", value_name = "USER_ID", global = true)]
    pub as_user: Option<UserId>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a contract spreadsheet into the audit queue.
    Import(ImportArgs),

    /// Show column-mapping suggestions for a file without importing it.
    Suggest(SuggestArgs),

    /// List the canonical fields a column mapping may target.
    Fields,

    /// Inspect and triage the audit queue.
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },

    /// Drive the contract approval lifecycle.
    Contract {
        #[command(subcommand)]
        command: ContractCommand,
    },

    /// Run the deadline-reminder sweep over active contracts.
    Sweep(SweepArgs),

    /// Manage departments in the snapshot.
    Department {
        #[command(subcommand)]
        command: DepartmentCommand,
    },

    /// Manage user accounts in the snapshot.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Spreadsheet to import (.csv, .xlsx or .xls).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Department the imported rows belong to.
    #[arg(long = "department", value_name = "DEPT_ID")]
    pub department: DepartmentId,

    /// Column mapping as JSON ({"CNPJ": "cnpj", ...}); suggested
    /// automatically when omitted.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Override the auto-detected header row (0-based).
    #[arg(long = "header-row", value_name = "INDEX")]
    pub header_row: Option<usize>,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Spreadsheet to inspect (.csv, .xlsx or .xls).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Override the auto-detected header row (0-based).
    #[arg(long = "header-row", value_name = "INDEX")]
    pub header_row: Option<usize>,
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// List pending audit-queue items.
    List {
        /// Restrict the listing to one department.
        #[arg(long = "department", value_name = "DEPT_ID")]
        department: Option<DepartmentId>,
    },

    /// Mark a pending item as ignored.
    Ignore {
        #[arg(value_name = "ITEM_ID")]
        item: AuditItemId,
    },

    /// Convert a pending item into a contract.
    Convert {
        #[arg(value_name = "ITEM_ID")]
        item: AuditItemId,

        /// Completed contract draft as JSON.
        #[arg(long = "draft", value_name = "PATH")]
        draft: PathBuf,

        /// Free-form triage notes recorded on the item.
        #[arg(long = "notes", value_name = "TEXT")]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ContractCommand {
    /// List contracts by status.
    List {
        #[arg(long = "status", value_enum, default_value = "active")]
        status: StatusArg,
    },

    /// Approve a pending contract.
    Approve {
        #[arg(value_name = "CONTRACT_ID")]
        contract: ContractId,
    },

    /// Reject a pending contract.
    Reject {
        #[arg(value_name = "CONTRACT_ID")]
        contract: ContractId,

        /// Reason recorded on the contract.
        #[arg(long = "reason", value_name = "TEXT")]
        reason: Option<String>,
    },

    /// Close an active contract.
    Close {
        #[arg(value_name = "CONTRACT_ID")]
        contract: ContractId,
    },
}

#[derive(Parser)]
pub struct SweepArgs {
    /// Sweep as of this date instead of today (ISO, e.g. 2026-03-01).
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum DepartmentCommand {
    /// Create a department.
    Add {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long = "description", value_name = "TEXT")]
        description: Option<String>,
    },

    /// List departments.
    List,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user account.
    Add {
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Display name.
        #[arg(long = "name", value_name = "TEXT")]
        full_name: String,

        #[arg(long = "role", value_enum)]
        role: RoleArg,

        #[arg(long = "department", value_name = "DEPT_ID")]
        department: Option<DepartmentId>,
    },
}

/// CLI contract status choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Active,
    Closed,
    Rejected,
}

impl From<StatusArg> for ContractStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::PendingApproval,
            StatusArg::Active => Self::Active,
            StatusArg::Closed => Self::Closed,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

/// CLI user role choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Manager,
    Requester,
}

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::SuperAdmin,
            RoleArg::Manager => Self::DepartmentManager,
            RoleArg::Requester => Self::Requester,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
