//! Service layer for FundLedger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling authorization, validation and audit for each operation.

pub mod ledger;
pub mod transaction;
pub mod user;

pub use ledger::{IntegrityReport, LedgerService, PostingInput};
pub use transaction::{TransactionFilter, TransactionService};
pub use user::UserService;
