//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod export;
pub mod ledger;
pub mod parse;
pub mod report;
pub mod transaction;
pub mod user;

pub use auth::Credentials;
pub use export::{handle_export_command, ExportCommands};
pub use ledger::{
    handle_balance_command, handle_post_command, handle_rebuild_command, handle_verify_command,
    PostCommands, PostingArgs,
};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, FilterArgs, TransactionCommands};
pub use user::{handle_user_command, UserCommands};
