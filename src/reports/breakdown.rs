//! Category Breakdown Report
//!
//! Totals income or expenses per category, with each category's share of
//! the kind total.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Money, Transaction, TransactionKind};
use crate::storage::Storage;

/// One category's line in a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    /// Sum of amounts in this category
    pub total: Money,
    /// Number of transactions
    pub transaction_count: usize,
    /// Share of the kind total; `None` when the kind total is zero
    pub percentage: Option<f64>,
}

/// Breakdown of one kind of transaction by category
#[derive(Debug, Clone)]
pub struct CategoryBreakdown {
    pub kind: TransactionKind,
    /// Largest total first, ties by category name
    pub rows: Vec<CategoryTotal>,
    /// Sum over all rows
    pub total: Money,
    pub transaction_count: usize,
}

impl CategoryBreakdown {
    /// Break down every stored transaction of `kind`
    pub fn generate(storage: &Storage, kind: TransactionKind) -> LedgerResult<Self> {
        let transactions = storage.ledger.get_all()?;
        Self::from_transactions(kind, &transactions)
    }

    /// Break down the transactions of `kind` in `transactions`; others are ignored
    pub fn from_transactions(
        kind: TransactionKind,
        transactions: &[Transaction],
    ) -> LedgerResult<Self> {
        let overflow = || LedgerError::Validation(format!("{} totals overflow", kind));
        let mut by_category: HashMap<Category, (Money, usize)> = HashMap::new();
        let mut total = Money::zero();
        let mut transaction_count = 0;

        for txn in transactions.iter().filter(|t| t.kind == kind) {
            let entry = by_category
                .entry(txn.category)
                .or_insert((Money::zero(), 0));
            entry.0 = entry.0.checked_add(txn.amount).ok_or_else(overflow)?;
            entry.1 += 1;
            total = total.checked_add(txn.amount).ok_or_else(overflow)?;
            transaction_count += 1;
        }

        let mut rows: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, (amount, count))| CategoryTotal {
                category,
                total: amount,
                transaction_count: count,
                percentage: percentage_of(amount, total),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });

        Ok(Self {
            kind,
            rows,
            total,
            transaction_count,
        })
    }

    /// No transactions of this kind
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format the breakdown for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        let title = match self.kind {
            TransactionKind::Income => "Income Breakdown",
            TransactionKind::Expense => "Expense Breakdown",
        };
        output.push_str(title);
        output.push('\n');
        output.push_str(&"=".repeat(64));
        output.push('\n');

        if self.is_empty() {
            output.push_str(&format!("No {} data available\n", self.kind));
            return output;
        }

        output.push_str(&format!(
            "{:<28} {:>16} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<28} {:>16} {:>8} {:>8}\n",
                row.category.label(),
                row.total.format_with_symbol(currency_symbol),
                row.transaction_count,
                format_share(row.percentage)
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>16} {:>8}\n",
            "TOTAL",
            self.total.format_with_symbol(currency_symbol),
            self.transaction_count
        ));

        output
    }

    /// Export the breakdown to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        export_breakdowns_csv(std::slice::from_ref(self), writer)
    }
}

/// Export several breakdowns under one CSV header
pub fn export_breakdowns_csv<W: Write>(
    breakdowns: &[CategoryBreakdown],
    writer: W,
) -> LedgerResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    let export_err = |e: ::csv::Error| LedgerError::Export(e.to_string());

    csv.write_record(["kind", "category", "amount", "count", "percentage"])
        .map_err(export_err)?;

    for breakdown in breakdowns {
        for row in &breakdown.rows {
            let percentage = row
                .percentage
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default();
            csv.write_record([
                breakdown.kind.to_string(),
                row.category.label().to_string(),
                row.total.to_plain_string(),
                row.transaction_count.to_string(),
                percentage,
            ])
            .map_err(export_err)?;
        }
    }

    csv.flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// `part` as a percentage of `whole`, or `None` if `whole` is zero
pub fn percentage_of(part: Money, whole: Money) -> Option<f64> {
    if whole.is_zero() {
        None
    } else {
        Some(part.cents() as f64 * 100.0 / whole.cents() as f64)
    }
}

/// One-decimal percentage, or "no data"
pub fn format_share(percentage: Option<f64>) -> String {
    match percentage {
        Some(pct) => format!("{:.1}%", pct),
        None => "no data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Department, ExpenseCategory, IncomeCategory, TransactionStatus, UserId,
    };
    use chrono::NaiveDate;

    fn txn(category: Category, units: i64) -> Transaction {
        Transaction::new(
            UserId::new(),
            "Someone",
            category,
            "",
            Money::from_units_cents(units, 0),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Department::Arts,
            TransactionStatus::Pending,
        )
    }

    #[test]
    fn test_thirty_seventy_split() {
        let transactions = vec![
            txn(IncomeCategory::HostelFees.into(), 300),
            txn(IncomeCategory::AdmissionFees.into(), 700),
        ];

        let breakdown = CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions).unwrap();

        assert_eq!(breakdown.total, Money::from_units_cents(1000, 0));
        assert_eq!(breakdown.rows.len(), 2);
        assert_eq!(breakdown.rows[0].category, Category::from(IncomeCategory::AdmissionFees));
        assert_eq!(breakdown.rows[0].percentage, Some(70.0));
        assert_eq!(breakdown.rows[1].category, Category::from(IncomeCategory::HostelFees));
        assert_eq!(breakdown.rows[1].percentage, Some(30.0));

        let sum: Money = breakdown.rows.iter().map(|r| r.total).sum();
        assert_eq!(sum, breakdown.total);
    }

    #[test]
    fn test_groups_and_counts() {
        let transactions = vec![
            txn(ExpenseCategory::Maintenance.into(), 100),
            txn(ExpenseCategory::Maintenance.into(), 50),
            txn(ExpenseCategory::TeacherSalary.into(), 150),
            txn(IncomeCategory::OtherIncome.into(), 9999),
        ];

        let breakdown = CategoryBreakdown::from_transactions(TransactionKind::Expense, &transactions).unwrap();

        assert_eq!(breakdown.transaction_count, 3);
        assert_eq!(breakdown.total, Money::from_units_cents(300, 0));
        // Equal totals fall back to name order
        assert_eq!(breakdown.rows[0].category, Category::from(ExpenseCategory::Maintenance));
        assert_eq!(breakdown.rows[0].transaction_count, 2);
        assert_eq!(breakdown.rows[1].category, Category::from(ExpenseCategory::TeacherSalary));
    }

    #[test]
    fn test_empty_breakdown() {
        let breakdown = CategoryBreakdown::from_transactions(TransactionKind::Income, &[]).unwrap();
        assert!(breakdown.is_empty());
        assert!(breakdown.total.is_zero());
        assert!(breakdown
            .format_terminal("Rs.")
            .contains("No income data available"));
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let huge = |category: Category| {
            let mut t = txn(category, 0);
            t.amount = Money::from_cents(i64::MAX - 1);
            t
        };
        let transactions = vec![
            huge(IncomeCategory::HostelFees.into()),
            huge(IncomeCategory::AdmissionFees.into()),
        ];

        let err = CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(percentage_of(Money::zero(), Money::zero()), None);
        assert_eq!(format_share(None), "no data");
        assert_eq!(format_share(Some(33.333)), "33.3%");
    }

    #[test]
    fn test_format_terminal() {
        let transactions = vec![txn(IncomeCategory::HostelFees.into(), 1500)];
        let output = CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions).unwrap()
            .format_terminal("Rs.");

        assert!(output.contains("Income Breakdown"));
        assert!(output.contains("Hostel Fees"));
        assert!(output.contains("Rs.1,500.00"));
        assert!(output.contains("100.0%"));
    }

    #[test]
    fn test_export_csv() {
        let transactions = vec![
            txn(IncomeCategory::HostelFees.into(), 300),
            txn(IncomeCategory::AdmissionFees.into(), 700),
        ];
        let breakdown = CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions).unwrap();

        let mut out = Vec::new();
        breakdown.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "kind,category,amount,count,percentage");
        assert_eq!(lines[1], "income,Admission Fees,700.00,1,70.00");
        assert_eq!(lines[2], "income,Hostel Fees,300.00,1,30.00");
    }

    #[test]
    fn test_export_both_kinds_single_header() {
        let transactions = vec![
            txn(IncomeCategory::HostelFees.into(), 300),
            txn(ExpenseCategory::Maintenance.into(), 100),
        ];
        let breakdowns = [
            CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions).unwrap(),
            CategoryBreakdown::from_transactions(TransactionKind::Expense, &transactions).unwrap(),
        ];

        let mut out = Vec::new();
        export_breakdowns_csv(&breakdowns, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("kind,category").count(), 1);
        assert!(text.contains("income,Hostel Fees,300.00,1,100.00"));
        assert!(text.contains("expense,Maintenance,100.00,1,100.00"));
    }
}
