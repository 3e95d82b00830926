//! Contract vendor pipeline CLI.

use clap::{ColorChoice, Parser};
use cvp_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{
    AuditCommand, Cli, Command, ContractCommand, DepartmentCommand, LogFormatArg, LogLevelArg,
    UserCommand,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Import(args) => {
            let result = commands::run_import(&cli.store, cli.as_user, args)?;
            summary::print_import_summary(&result);
        }
        Command::Suggest(args) => {
            let suggestions = commands::run_suggest(args)?;
            summary::print_suggestions(&suggestions);
        }
        Command::Fields => summary::print_fields(),
        Command::Audit { command } => match command {
            AuditCommand::List { department } => {
                let items = commands::run_audit_list(&cli.store, *department)?;
                summary::print_audit_items(&items);
            }
            AuditCommand::Ignore { item } => {
                let item = commands::run_audit_ignore(&cli.store, cli.as_user, *item)?;
                println!("audit item {} is now {}", item.id, item.status);
            }
            AuditCommand::Convert { item, draft, notes } => {
                let (item, contract) = commands::run_audit_convert(
                    &cli.store,
                    cli.as_user,
                    *item,
                    draft,
                    notes.clone(),
                )?;
                println!(
                    "audit item {} converted into contract {} ({})",
                    item.id, contract.id, contract.status
                );
            }
        },
        Command::Contract { command } => match command {
            ContractCommand::List { status } => {
                let contracts = commands::run_contract_list(&cli.store, (*status).into())?;
                summary::print_contracts(&contracts);
            }
            ContractCommand::Approve { contract } => {
                let contract =
                    commands::run_contract_approve(&cli.store, cli.as_user, *contract)?;
                println!("contract {} is now {}", contract.id, contract.status);
            }
            ContractCommand::Reject { contract, reason } => {
                let contract = commands::run_contract_reject(
                    &cli.store,
                    cli.as_user,
                    *contract,
                    reason.clone(),
                )?;
                println!("contract {} is now {}", contract.id, contract.status);
            }
            ContractCommand::Close { contract } => {
                let contract = commands::run_contract_close(&cli.store, cli.as_user, *contract)?;
                println!("contract {} is now {}", contract.id, contract.status);
            }
        },
        Command::Sweep(args) => {
            let result = commands::run_sweep(&cli.store, cli.as_user, args)?;
            summary::print_sweep_summary(&result);
        }
        Command::Department { command } => match command {
            DepartmentCommand::Add { name, description } => {
                let department = commands::run_department_add(
                    &cli.store,
                    name.clone(),
                    description.clone(),
                )?;
                println!("created department {} ({})", department.name, department.id);
            }
            DepartmentCommand::List => {
                let departments = commands::run_department_list(&cli.store)?;
                summary::print_departments(&departments);
            }
        },
        Command::User { command } => match command {
            UserCommand::Add {
                email,
                full_name,
                role,
                department,
            } => {
                let user = commands::run_user_add(
                    &cli.store,
                    email.clone(),
                    full_name.clone(),
                    (*role).into(),
                    *department,
                )?;
                println!("created user {} ({})", user.email, user.id);
            }
        },
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
