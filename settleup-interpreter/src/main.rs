#![warn(clippy::uninlined_format_args)]

mod book;
mod config;

use std::{borrow::Cow, env, fs, io, process};

use book::{BookEntry, LedgerBook};
use config::CliConfig;
use settleup_application::{
    CurrencyContext, GroupId, SettlementService, SettlementServiceError,
};
use settleup_infrastructure::InMemoryExpenseRepository;
use settleup_parser::parse_ledger;
use settleup_presentation::SettlementPresenter;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Cow<'static, str>>;

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: settleup <ledger-file>".into());
    };

    let config = CliConfig::from_env().map_err(|err| format!("Invalid configuration: {err}"))?;

    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;

    let report = settle_source(&source, &config.currency)?;
    print!("{report}");
    Ok(())
}

/// Parses a ledger and renders every group's settlement.
///
/// Nothing is rendered unless every group settles.
fn settle_source(source: &str, currency: &CurrencyContext) -> CliResult<String> {
    let ledger = parse_ledger(source).map_err(|err| err.to_string())?;
    let book = LedgerBook::from_ledger(&ledger);
    tracing::debug!(
        group_count = book.groups.len(),
        expense_count = book.expense_count(),
        "Ledger loaded"
    );

    let repository = InMemoryExpenseRepository::new();
    let service = SettlementService::new(&repository, currency);
    let mut sections = Vec::with_capacity(book.groups.len());

    for (group, entries) in &book.groups {
        repository
            .create_group(group)
            .map_err(|err| err.to_string())?;

        let expenses = entries.iter().map(|entry| entry.expense.clone()).collect();
        service
            .record_expenses(group, expenses)
            .map_err(|err| describe_rejection(group, entries, err))?;

        let result = service
            .settle_group(group)
            .map_err(|err| format!("Group '{group}': {err}"))?;
        let view = SettlementPresenter::render_with_members(&result, &book.members, currency);
        sections.push(view.to_text(group.as_str()));
    }

    Ok(sections.join("\n"))
}

fn describe_rejection(
    group: &GroupId,
    entries: &[BookEntry],
    err: SettlementServiceError,
) -> Cow<'static, str> {
    match err {
        SettlementServiceError::Amount { index, source } => match entries.get(index) {
            Some(entry) => format!("Line {}: {source}", entry.line).into(),
            None => format!("Group '{group}': expense {index}: {source}").into(),
        },
        other => format!("Group '{group}': {other}").into(),
    }
}
