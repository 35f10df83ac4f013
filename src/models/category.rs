//! Fixed classifications used by ledger entries
//!
//! Income and expense categories, departments and the transaction kind. All
//! of them have a human label (used in reports and exports) and a forgiving
//! parser for CLI input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase and drop separators so "Hostel Fees", "hostel-fees" and
/// "HOSTEL_FEES" all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Macro to generate a closed set of labelled choices
macro_rules! define_choice {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse from a label, ignoring case, spaces, hyphens and underscores
            pub fn parse(s: &str) -> Option<Self> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.label()) == wanted)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

define_choice! {
    /// Sources of income
    IncomeCategory {
        AdmissionFees => "Admission Fees",
        GovernmentDonation => "Government Donation",
        HostelFees => "Hostel Fees",
        OtherIncome => "Other Income",
    }
}

define_choice! {
    /// Kinds of expenditure
    ExpenseCategory {
        TeacherSalary => "Teacher Salary",
        NonTeachingSalary => "Non-Teaching Salary",
        LabEquipment => "Lab Equipment",
        LibrarySupplies => "Library Supplies",
        Maintenance => "Maintenance",
        OtherExpense => "Other Expense",
    }
}

define_choice! {
    /// Organizational unit a transaction is booked against
    Department {
        Science => "Science",
        Arts => "Arts",
        Engineering => "Engineering",
        Medicine => "Medicine",
        Administration => "Administration",
    }
}

/// Whether a transaction adds to or draws from the fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: &'static [TransactionKind] = &[TransactionKind::Income, TransactionKind::Expense];

    /// Parse from "income"/"expense" (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "income" => Some(Self::Income),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A category of either kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Income(IncomeCategory),
    Expense(ExpenseCategory),
}

impl Category {
    /// The kind this category belongs to
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Income(_) => TransactionKind::Income,
            Self::Expense(_) => TransactionKind::Expense,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income(c) => c.label(),
            Self::Expense(c) => c.label(),
        }
    }

    /// Parse a category of any kind. Labels are unique across kinds.
    pub fn parse(s: &str) -> Option<Self> {
        IncomeCategory::parse(s)
            .map(Self::Income)
            .or_else(|| ExpenseCategory::parse(s).map(Self::Expense))
    }

    /// Parse a category that must belong to `kind`
    pub fn parse_for(kind: TransactionKind, s: &str) -> Option<Self> {
        match kind {
            TransactionKind::Income => IncomeCategory::parse(s).map(Self::Income),
            TransactionKind::Expense => ExpenseCategory::parse(s).map(Self::Expense),
        }
    }

    /// All categories of a kind, in declaration order
    pub fn all_for(kind: TransactionKind) -> Vec<Self> {
        match kind {
            TransactionKind::Income => IncomeCategory::ALL.iter().map(|c| Self::Income(*c)).collect(),
            TransactionKind::Expense => {
                ExpenseCategory::ALL.iter().map(|c| Self::Expense(*c)).collect()
            }
        }
    }
}

impl From<IncomeCategory> for Category {
    fn from(c: IncomeCategory) -> Self {
        Self::Income(c)
    }
}

impl From<ExpenseCategory> for Category {
    fn from(c: ExpenseCategory) -> Self {
        Self::Expense(c)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
