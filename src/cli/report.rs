//! Report CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::auth::Operation;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionKind;
use crate::reports::{export_breakdowns_csv, CategoryBreakdown, SummaryReport};
use crate::storage::Storage;

use super::auth::Credentials;
use super::parse::parse_kind;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals and shares per category
    Breakdown {
        /// Only income or only expense (default: both)
        #[arg(short, long)]
        kind: Option<String>,
        /// Write the breakdown to a CSV file instead of the terminal
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Income and expense summary, as printed in the PDF export
    Summary {
        /// Report title
        #[arg(short, long)]
        title: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    credentials.login_for(storage, settings, Operation::ViewLedger)?;

    match cmd {
        ReportCommands::Breakdown { kind, csv } => {
            let kinds = match kind {
                Some(k) => vec![parse_kind(&k)?],
                None => TransactionKind::ALL.to_vec(),
            };
            let transactions = storage.ledger.get_all()?;
            let breakdowns = kinds
                .into_iter()
                .map(|k| CategoryBreakdown::from_transactions(k, &transactions))
                .collect::<LedgerResult<Vec<_>>>()?;

            match csv {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    export_breakdowns_csv(&breakdowns, BufWriter::new(file))?;
                    println!("Breakdown written to {}", path.display());
                }
                None => {
                    for (i, breakdown) in breakdowns.iter().enumerate() {
                        if i > 0 {
                            println!();
                        }
                        print!("{}", breakdown.format_terminal(&settings.currency_symbol));
                    }
                }
            }
        }
        ReportCommands::Summary { title } => {
            let title = title.unwrap_or_else(|| settings.report_title.clone());
            let report = SummaryReport::generate(storage, title)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }
    }

    Ok(())
}
