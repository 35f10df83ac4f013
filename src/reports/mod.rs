//! Reports module for FundLedger
//!
//! Category breakdowns per transaction kind and the combined summary that
//! backs the PDF export.

pub mod breakdown;
pub mod summary;

pub use breakdown::{export_breakdowns_csv, format_share, percentage_of, CategoryBreakdown, CategoryTotal};
pub use summary::{LineStyle, SummaryLine, SummaryReport};
