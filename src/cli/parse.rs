//! Argument parsing shared by CLI commands

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Department, Money, TransactionKind, TransactionStatus};

/// Parse a date in the configured format, falling back to ISO `YYYY-MM-DD`
pub fn parse_date(s: &str, date_format: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), date_format)
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .map_err(|_| {
            LedgerError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
        })
}

/// Parse a money amount
pub fn parse_amount(s: &str) -> LedgerResult<Money> {
    Money::parse(s).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1000' or '1,250.50' ({})",
            s, e
        ))
    })
}

/// Parse a category name belonging to `kind`
pub fn parse_category_for(kind: TransactionKind, s: &str) -> LedgerResult<Category> {
    Category::parse_for(kind, s).ok_or_else(|| {
        let options: Vec<_> = Category::all_for(kind)
            .iter()
            .map(|c| c.label())
            .collect();
        LedgerError::Validation(format!(
            "Unknown {} category '{}'. Expected one of: {}",
            kind,
            s,
            options.join(", ")
        ))
    })
}

/// Parse a category name of either kind
pub fn parse_category(s: &str) -> LedgerResult<Category> {
    Category::parse(s)
        .ok_or_else(|| LedgerError::Validation(format!("Unknown category '{}'", s)))
}

/// Parse a department name
pub fn parse_department(s: &str) -> LedgerResult<Department> {
    Department::parse(s).ok_or_else(|| {
        let options: Vec<_> = Department::ALL.iter().map(|d| d.label()).collect();
        LedgerError::Validation(format!(
            "Unknown department '{}'. Expected one of: {}",
            s,
            options.join(", ")
        ))
    })
}

/// Parse a status name
pub fn parse_status(s: &str) -> LedgerResult<TransactionStatus> {
    TransactionStatus::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Unknown status '{}'. Expected pending, received or paid",
            s
        ))
    })
}

/// Parse "income" or "expense"
pub fn parse_kind(s: &str) -> LedgerResult<TransactionKind> {
    TransactionKind::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Unknown transaction kind '{}'. Expected income or expense",
            s
        ))
    })
}
