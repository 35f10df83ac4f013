//! Core data models for FundLedger
//!
//! This module contains the data structures of the ledger domain: users,
//! the fund, income/expense transactions and their classifications.

pub mod category;
pub mod fund;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod user;

pub use category::{Category, Department, ExpenseCategory, IncomeCategory, TransactionKind};
pub use fund::{Fund, FUND_ID};
pub use ids::{TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionStatus, TransactionValidationError};
pub use user::{Role, User};
