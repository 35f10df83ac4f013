//! Transaction CLI commands
//!
//! Listing and inspecting posted income and expenses.

use clap::{Args, Subcommand};

use crate::auth::Operation;
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{LedgerError, LedgerResult};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::auth::Credentials;
use super::parse::{parse_category, parse_date, parse_department, parse_kind, parse_status};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (full or the short form shown in listings)
        id: String,
    },
}

/// Filters shared by listing and export
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only income or only expense
    #[arg(short, long)]
    pub kind: Option<String>,
    /// Category name (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,
    /// Department name (repeatable)
    #[arg(short = 'D', long = "department")]
    pub departments: Vec<String>,
    /// Status (repeatable)
    #[arg(short, long = "status")]
    pub statuses: Vec<String>,
    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    /// Build a service filter from the arguments
    pub fn to_filter(&self, settings: &Settings) -> LedgerResult<TransactionFilter> {
        let mut filter = TransactionFilter::new();

        if let Some(kind) = &self.kind {
            filter = filter.kind(parse_kind(kind)?);
        }
        for category in &self.categories {
            filter = filter.category(parse_category(category)?);
        }
        for department in &self.departments {
            filter = filter.department(parse_department(department)?);
        }
        for status in &self.statuses {
            filter = filter.status(parse_status(status)?);
        }
        if let Some(from) = &self.from {
            filter = filter.since(parse_date(from, &settings.date_format)?);
        }
        if let Some(to) = &self.to {
            filter = filter.until(parse_date(to, &settings.date_format)?);
        }

        Ok(filter)
    }
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    credentials.login_for(storage, settings, Operation::ViewLedger)?;
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::List { filter, limit } => {
            let filter = filter.to_filter(settings)?.limit(limit);
            let transactions = service.list(&filter)?;

            print!(
                "{}",
                format_transaction_table(&transactions, &settings.currency_symbol)
            );
            if !transactions.is_empty() {
                println!(
                    "{} transaction(s), total {}",
                    transactions.len(),
                    TransactionService::total_amount(&transactions)
                        .format_with_symbol(&settings.currency_symbol)
                );
            }
        }
        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| LedgerError::transaction_not_found(&id))?;

            let poster = storage.users.get(txn.user_id)?.map(|u| u.username);

            print!(
                "{}",
                format_transaction_details(&txn, poster.as_deref(), &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
