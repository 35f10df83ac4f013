//! Display formatting for terminal output
//!
//! Formats ledger data for the CLI. Report layouts live with the reports
//! themselves; this module covers listings and status views.

pub mod ledger;
pub mod transaction;
pub mod user;

pub use ledger::{format_balance, format_integrity_report};
pub use transaction::{format_transaction_details, format_transaction_table};
pub use user::{format_session, format_user_list};
