//! Export CLI commands
//!
//! Writes filtered transactions to CSV and the financial summary to PDF.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::auth::Operation;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_summary_pdf, export_transactions_csv};
use crate::reports::SummaryReport;
use crate::services::TransactionService;
use crate::storage::Storage;

use super::auth::Credentials;
use super::transaction::FilterArgs;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export transactions to CSV
    Csv {
        /// Output file path
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export the income/expense summary to PDF
    Pdf {
        /// Output file path
        output: PathBuf,
        /// Report title (defaults to the configured report title)
        #[arg(short, long)]
        title: Option<String>,
    },
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
    cmd: ExportCommands,
) -> LedgerResult<()> {
    credentials.login_for(storage, settings, Operation::ViewLedger)?;

    match cmd {
        ExportCommands::Csv { output, filter } => {
            let filter = filter.to_filter(settings)?;
            let transactions = TransactionService::new(storage).list(&filter)?;

            export_transactions_csv(&transactions, create_output(&output)?)?;
            tracing::info!(path = %output.display(), rows = transactions.len(), "csv exported");
            println!(
                "Exported {} transaction(s) to {}",
                transactions.len(),
                output.display()
            );
        }
        ExportCommands::Pdf { output, title } => {
            let title = title.unwrap_or_else(|| settings.report_title.clone());
            let report = SummaryReport::generate(storage, title)?;

            export_summary_pdf(&report, &settings.currency_symbol, create_output(&output)?)?;
            tracing::info!(path = %output.display(), "pdf exported");
            println!("Summary report written to {}", output.display());
        }
    }

    Ok(())
}

fn create_output(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
