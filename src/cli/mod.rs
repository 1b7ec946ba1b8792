//! Thin command-line front end over the expense store.

pub mod output;

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};

use thiserror::Error;

use crate::config::ConfigManager;
use crate::core::{
    errors::ExpenseError,
    expense_store::ExpenseStore,
    identity::{IdentityProvider, StaticIdentity},
    services::ExpenseService,
    submitter::MockLedgerSubmitter,
    utils::PathResolver,
};
use crate::domain::{format_currency, ExpenseCategory};
use crate::storage::JsonStorage;
use crate::utils::build_info;

use output::MessageKind;

/// Environment variable supplying the owner when `--owner` is absent.
pub const OWNER_ENV: &str = "EXPENSE_CORE_OWNER";

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error("{0}")]
    Usage(String),
    #[error("Output failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Default)]
struct Invocation {
    owner: Option<String>,
    home: Option<PathBuf>,
    command: Option<String>,
    args: Vec<String>,
}

/// Runs the CLI against the process arguments and stdout.
pub fn run_cli() -> Result<(), CliError> {
    output::configure_colors();
    let args: Vec<String> = env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run(args, &mut handle)
}

pub fn run(args: Vec<String>, out: &mut dyn Write) -> Result<(), CliError> {
    let invocation = parse_args(args)?;
    let command = match invocation.command.as_deref() {
        None | Some("help") => {
            writeln!(out, "{}", usage())?;
            return Ok(());
        }
        Some("version") => {
            writeln!(out, "{}", build_info::current().summary())?;
            return Ok(());
        }
        Some(command) => command.to_string(),
    };

    let base = invocation.home.clone().unwrap_or_else(PathResolver::base_dir);
    let config = ConfigManager::with_base_dir(base.clone())?.load()?;
    if command == "config" {
        writeln!(out, "{}", serde_json::to_string_pretty(&config).map_err(ExpenseError::from)?)?;
        return Ok(());
    }

    let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
    let backups = storage.clone();
    let mut store = ExpenseStore::new(Box::new(storage), config);
    if store.config().ledger_submission {
        store = store.with_submitter(Box::new(MockLedgerSubmitter));
    }

    let identity = match invocation.owner.clone().or_else(|| env::var(OWNER_ENV).ok()) {
        Some(owner) => StaticIdentity::connected(owner),
        None => StaticIdentity::disconnected(),
    };
    connect(&mut store, &identity)?;
    let currency = store.budget()?.currency.clone();

    match command.as_str() {
        "add" => {
            let (amount, category, description) = parse_add_args(&invocation.args)?;
            let expense = store.add_expense(amount, category, &description)?;
            let reference = expense
                .transaction_reference
                .as_ref()
                .map(|reference| format!(" (ref {})", reference.short()))
                .unwrap_or_default();
            let message = format!(
                "Added {} {} expense: {}{}",
                format_currency(expense.amount, &currency),
                expense.category,
                expense.description,
                reference
            );
            writeln!(out, "{}", output::styled(MessageKind::Success, &message))?;
        }
        "budget" => {
            let limits = parse_limits(&invocation.args)?;
            let budget = store.set_budget(limits[0], limits[1], limits[2])?;
            let message = format!(
                "Budget set: daily {}, weekly {}, monthly {}",
                format_currency(budget.daily_limit(), &currency),
                format_currency(budget.weekly_limit(), &currency),
                format_currency(budget.monthly_limit(), &currency),
            );
            writeln!(out, "{}", output::styled(MessageKind::Success, &message))?;
        }
        "summary" => {
            writeln!(out, "{}", output::render_totals(&store.spending_totals()?, &currency))?;
            writeln!(out, "{}", output::render_health(&store.budget_health()?, &currency))?;
        }
        "breakdown" => {
            writeln!(
                out,
                "{}",
                output::render_breakdown(&store.category_breakdown()?, &currency)
            )?;
        }
        "recent" => {
            let total = store.expenses()?.len();
            writeln!(
                out,
                "{}",
                output::render_expenses(&store.recent_expenses()?, total, &currency)
            )?;
        }
        "dashboard" => {
            let stats = store.dashboard()?;
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&stats).map_err(ExpenseError::from)?
            )?;
        }
        "backups" => {
            let owner = store.owner()?.clone();
            let names = backups.list_backups(&owner)?;
            if names.is_empty() {
                writeln!(out, "No backups for {}.", owner)?;
            }
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        other => {
            return Err(CliError::Usage(format!(
                "unknown command `{}`\n{}",
                other,
                usage()
            )))
        }
    }
    Ok(())
}

fn connect(store: &mut ExpenseStore, identity: &dyn IdentityProvider) -> Result<(), CliError> {
    match store.connect(identity) {
        Ok(_) => Ok(()),
        Err(ExpenseError::NotAuthenticated) => Err(CliError::Usage(format!(
            "no owner given; pass --owner <id> or set {}",
            OWNER_ENV
        ))),
        Err(err) => Err(err.into()),
    }
}

fn parse_args(args: Vec<String>) -> Result<Invocation, CliError> {
    let mut invocation = Invocation::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--owner" => {
                invocation.owner = Some(
                    iter.next()
                        .ok_or_else(|| CliError::Usage("--owner needs a value".into()))?,
                );
            }
            "--home" => {
                invocation.home = Some(PathBuf::from(
                    iter.next()
                        .ok_or_else(|| CliError::Usage("--home needs a value".into()))?,
                ));
            }
            "-h" | "--help" => invocation.command = Some("help".into()),
            _ if invocation.command.is_none() => invocation.command = Some(arg),
            _ => invocation.args.push(arg),
        }
    }
    Ok(invocation)
}

fn parse_add_args(args: &[String]) -> Result<(f64, ExpenseCategory, String), CliError> {
    if args.len() < 3 {
        return Err(CliError::Usage(
            "usage: add <amount> <category> <description>".into(),
        ));
    }
    let amount = ExpenseService::parse_amount(&args[0])?;
    let category: ExpenseCategory = args[1].parse()?;
    Ok((amount, category, args[2..].join(" ")))
}

fn parse_limits(args: &[String]) -> Result<[f64; 3], CliError> {
    if args.len() != 3 {
        return Err(CliError::Usage(
            "usage: budget <daily> <weekly> <monthly>".into(),
        ));
    }
    let mut limits = [0.0; 3];
    for (slot, raw) in limits.iter_mut().zip(args) {
        *slot = raw.trim().parse().map_err(|_| {
            ExpenseError::validation(format!("`{}` is not a valid limit", raw))
        })?;
    }
    Ok(limits)
}

fn usage() -> String {
    format!(
        "Usage: expense_core_cli [--owner <id>] [--home <dir>] <command>\n\
         Commands:\n  \
         add <amount> <category> <description>   record an expense (Food, Transport, School, Misc)\n  \
         budget <daily> <weekly> <monthly>       replace the budget\n  \
         summary                                 spending totals and budget health\n  \
         breakdown                               spending per category\n  \
         recent                                  latest expenses\n  \
         dashboard                               all derived stats as JSON\n  \
         backups                                 list saved backups\n  \
         config                                  show the active configuration\n  \
         version                                 build information\n\
         The owner may also be set with {}.",
        OWNER_ENV
    )
}
