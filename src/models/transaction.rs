//! Transaction model
//!
//! A single ledger entry, either income or expense. Entries are append-only:
//! once posted they are never edited or removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, Department, TransactionKind};
use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Descriptive settlement status recorded at posting time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not yet settled (valid for both kinds)
    #[default]
    Pending,
    /// Income has been received
    Received,
    /// Expense has been paid
    Paid,
}

impl TransactionStatus {
    /// Whether this status may be recorded on a transaction of `kind`
    pub fn applies_to(&self, kind: TransactionKind) -> bool {
        match self {
            Self::Pending => true,
            Self::Received => kind == TransactionKind::Income,
            Self::Paid => kind == TransactionKind::Expense,
        }
    }

    /// Parse status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "received" => Some(Self::Received),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// The settled status for a kind
    pub fn settled(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Received,
            TransactionKind::Expense => Self::Paid,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Received => write!(f, "Received"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// A posted income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Income or expense
    pub kind: TransactionKind,

    /// Counterparty name (payer for income, payee for expenses)
    pub name: String,

    /// User who posted the entry
    pub user_id: UserId,

    /// Category; always of the same kind as the transaction
    #[serde(rename = "type")]
    pub category: Category,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Amount, always positive. The kind decides the sign of its effect.
    pub amount: Money,

    /// Effective date
    pub date: NaiveDate,

    /// Department the entry is booked against
    pub department: Department,

    /// Settlement status at posting time
    pub status: TransactionStatus,

    /// Optional reference to a stored receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,

    /// When the entry was posted
    pub created_at: DateTime<Utc>,

    /// Position in posting order, assigned when the entry is committed
    #[serde(default)]
    pub sequence: u64,
}

impl Transaction {
    /// Build a new entry. `kind` is taken from the category.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        department: Department,
        status: TransactionStatus,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind: category.kind(),
            name: name.into(),
            user_id,
            category,
            description: description.into(),
            amount,
            date,
            department,
            status,
            receipt_path: None,
            created_at: Utc::now(),
            sequence: 0,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Effect of this entry on the fund balance (negative for expenses)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Validate the entry's shape
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.name.trim().is_empty() {
            return Err(TransactionValidationError::MissingName);
        }

        if self.category.kind() != self.kind {
            return Err(TransactionValidationError::CategoryKindMismatch {
                kind: self.kind,
                category: self.category,
            });
        }

        if !self.status.applies_to(self.kind) {
            return Err(TransactionValidationError::StatusKindMismatch {
                kind: self.kind,
                status: self.status,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.category,
            self.name,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    MissingName,
    CategoryKindMismatch {
        kind: TransactionKind,
        category: Category,
    },
    StatusKindMismatch {
        kind: TransactionKind,
        status: TransactionStatus,
    },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::MissingName => write!(f, "Name is required"),
            Self::CategoryKindMismatch { kind, category } => {
                write!(f, "Category '{}' cannot be used for {}", category, kind)
            }
            Self::StatusKindMismatch { kind, status } => {
                write!(f, "Status '{}' cannot be used for {}", status, kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, IncomeCategory};

    fn income(amount: i64) -> Transaction {
        Transaction::new(
            UserId::new(),
            "Ravi Kumar",
            IncomeCategory::HostelFees.into(),
            "Semester fees",
            Money::from_cents(amount),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Department::Science,
            TransactionStatus::Received,
        )
    }

    #[test]
    fn test_new_takes_kind_from_category() {
        let txn = income(1000);
        assert!(txn.is_income());
        assert_eq!(txn.signed_amount().cents(), 1000);
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_expense_signed_amount_is_negative() {
        let txn = Transaction::new(
            UserId::new(),
            "Lab Vendor",
            ExpenseCategory::LabEquipment.into(),
            "",
            Money::from_cents(2500),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Department::Engineering,
            TransactionStatus::Paid,
        );
        assert!(txn.is_expense());
        assert_eq!(txn.signed_amount().cents(), -2500);
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(
            income(0).validate(),
            Err(TransactionValidationError::NonPositiveAmount(Money::zero()))
        );
        assert!(income(-5).validate().is_err());
    }

    #[test]
    fn test_validate_name() {
        let mut txn = income(100);
        txn.name = "   ".into();
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingName));
    }

    #[test]
    fn test_validate_status_kind() {
        let mut txn = income(100);
        txn.status = TransactionStatus::Paid;
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::StatusKindMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_category_kind() {
        let mut txn = income(100);
        txn.category = ExpenseCategory::Maintenance.into();
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::CategoryKindMismatch { .. })
        ));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TransactionStatus::parse("PAID"), Some(TransactionStatus::Paid));
        assert_eq!(TransactionStatus::parse("cleared"), None);
        assert_eq!(
            TransactionStatus::settled(TransactionKind::Income),
            TransactionStatus::Received
        );
    }

    #[test]
    fn test_serialization_uses_type_field() {
        let txn = income(1000);
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "hostel_fees");
        assert_eq!(json["kind"], "income");
        assert!(json.get("receipt_path").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
