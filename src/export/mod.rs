//! Export module for FundLedger
//!
//! - CSV: transaction listings (spreadsheet-compatible)
//! - PDF: the printable income/expense summary

pub mod csv;
pub mod pdf;

pub use self::csv::{export_transactions_csv, transactions_csv_bytes, TRANSACTION_HEADER};
pub use self::pdf::{export_summary_pdf, summary_pdf_bytes};
