//! CSV Export functionality
//!
//! Writes transactions with a fixed header so exports from different runs
//! line up column for column.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Transaction;

/// Column order of a transaction export
pub const TRANSACTION_HEADER: [&str; 11] = [
    "transaction_type",
    "id",
    "name",
    "user_id",
    "type",
    "description",
    "amount",
    "date",
    "department",
    "status",
    "created_at",
];

/// Export transactions to CSV, one row each, in the order given
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> LedgerResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    let export_err = |e: ::csv::Error| LedgerError::Export(e.to_string());

    csv.write_record(TRANSACTION_HEADER).map_err(export_err)?;

    for txn in transactions {
        csv.write_record([
            txn.kind.to_string(),
            txn.id.as_uuid().to_string(),
            txn.name.clone(),
            txn.user_id.as_uuid().to_string(),
            txn.category.label().to_string(),
            txn.description.clone(),
            txn.amount.to_plain_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.department.label().to_string(),
            txn.status.to_string(),
            txn.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])
        .map_err(export_err)?;
    }

    csv.flush()
        .map_err(|e| LedgerError::Export(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

/// [`export_transactions_csv`] into memory
pub fn transactions_csv_bytes(transactions: &[Transaction]) -> LedgerResult<Vec<u8>> {
    let mut buffer = Vec::new();
    export_transactions_csv(transactions, &mut buffer)?;
    Ok(buffer)
}
