//! Ledger CLI commands
//!
//! Posting income and expenses, the balance, and integrity checks.

use chrono::Local;
use clap::{Args, Subcommand};

use crate::auth::Operation;
use crate::config::Settings;
use crate::display::{format_balance, format_integrity_report};
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionKind;
use crate::services::{LedgerService, PostingInput};
use crate::storage::Storage;

use super::auth::Credentials;
use super::parse::{parse_amount, parse_category_for, parse_date, parse_department, parse_status};

/// Income and expense subcommands
#[derive(Subcommand)]
pub enum PostCommands {
    /// Post a new entry
    Add(PostingArgs),
}

/// Fields of a posting
#[derive(Args)]
pub struct PostingArgs {
    /// Counterparty name (payer or payee)
    pub name: String,
    /// Amount (e.g., "1500" or "1,250.50")
    pub amount: String,
    /// Category name (e.g., "Hostel Fees", "Maintenance")
    #[arg(short, long)]
    pub category: String,
    /// Department name
    #[arg(short = 'D', long)]
    pub department: String,
    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
    /// Description
    #[arg(short = 'm', long)]
    pub description: Option<String>,
    /// Status: pending, received (income) or paid (expense)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Path of a scanned receipt to reference
    #[arg(long)]
    pub receipt: Option<String>,
}

impl PostingArgs {
    fn into_input(self, kind: TransactionKind, settings: &Settings) -> LedgerResult<PostingInput> {
        let date = match &self.date {
            Some(d) => parse_date(d, &settings.date_format)?,
            None => Local::now().date_naive(),
        };
        let status = self.status.as_deref().map(parse_status).transpose()?;

        Ok(PostingInput {
            category: parse_category_for(kind, &self.category)?,
            department: parse_department(&self.department)?,
            amount: parse_amount(&self.amount)?,
            name: self.name,
            description: self.description.unwrap_or_default(),
            date,
            status,
            receipt_path: self.receipt,
        })
    }
}

/// Handle an `income` or `expense` command
pub fn handle_post_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
    kind: TransactionKind,
    cmd: PostCommands,
) -> LedgerResult<()> {
    match cmd {
        PostCommands::Add(args) => {
            let input = args.into_input(kind, settings)?;
            let amount = input.amount;
            // The ledger service checks the role so refusals reach the audit trail
            let session = credentials.login(storage, settings)?;
            let service = LedgerService::new(storage);

            let id = match kind {
                TransactionKind::Income => service.post_income(&session, input)?,
                TransactionKind::Expense => service.post_expense(&session, input)?,
            };

            println!(
                "Posted {} of {} ({})",
                kind,
                amount.format_with_symbol(&settings.currency_symbol),
                id
            );
            println!(
                "Balance: {}",
                service
                    .current_balance()?
                    .format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

/// Handle the `balance` command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
) -> LedgerResult<()> {
    credentials.login_for(storage, settings, Operation::ViewLedger)?;
    let fund = storage.ledger.fund()?;

    println!("{}", settings.organization_name);
    print!("{}", format_balance(&fund, &settings.currency_symbol));
    Ok(())
}

/// Handle the `verify` command. Fails when the ledger is inconsistent.
pub fn handle_verify_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
) -> LedgerResult<()> {
    credentials.login_for(storage, settings, Operation::ViewLedger)?;
    let report = LedgerService::new(storage).integrity_report()?;

    print!(
        "{}",
        format_integrity_report(&report, &settings.currency_symbol)
    );

    if report.is_consistent() {
        Ok(())
    } else {
        Err(LedgerError::Storage(
            "Ledger integrity check failed".into(),
        ))
    }
}

/// Handle the `rebuild` command
pub fn handle_rebuild_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
) -> LedgerResult<()> {
    let session = credentials.login(storage, settings)?;
    let service = LedgerService::new(storage);

    let previous = service.current_balance()?;
    let report = service.rebuild_balance(&session)?;

    if previous == report.cached {
        println!("Balance already matches the journals; nothing to rebuild.");
    } else {
        println!(
            "Balance rebuilt: {} -> {}",
            previous.format_with_symbol(&settings.currency_symbol),
            report.cached.format_with_symbol(&settings.currency_symbol)
        );
    }
    if report.overdrawn_at.is_some() {
        print!(
            "{}",
            format_integrity_report(&report, &settings.currency_symbol)
        );
    }

    Ok(())
}
