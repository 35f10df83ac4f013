//! Balance and integrity display formatting

use crate::models::Fund;
use crate::services::IntegrityReport;

/// Format the fund balance line
pub fn format_balance(fund: &Fund, currency_symbol: &str) -> String {
    format!(
        "Current balance: {}\nLast updated:    {}\n",
        fund.balance.format_with_symbol(currency_symbol),
        fund.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Format an integrity report
pub fn format_integrity_report(report: &IntegrityReport, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Income:   {:>6} entries  {}\n",
        report.income_count,
        report.income_total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "Expenses: {:>6} entries  {}\n",
        report.expense_count,
        report.expense_total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "Replayed balance: {}\n",
        report.replayed.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "Cached balance:   {}\n",
        report.cached.format_with_symbol(currency_symbol)
    ));

    if let Some(id) = report.overdrawn_at {
        output.push_str(&format!(
            "Running balance goes negative at transaction {}\n",
            id.as_uuid()
        ));
    }

    if report.is_consistent() {
        output.push_str("Ledger is consistent.\n");
    } else {
        output.push_str("Ledger is INCONSISTENT. Run `fundledger rebuild` to recompute the balance.\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId};

    fn report(cached: i64, replayed: i64) -> IntegrityReport {
        IntegrityReport {
            cached: Money::from_cents(cached),
            replayed: Money::from_cents(replayed),
            income_total: Money::from_cents(replayed),
            expense_total: Money::zero(),
            income_count: 1,
            expense_count: 0,
            overdrawn_at: None,
        }
    }

    #[test]
    fn test_consistent_report() {
        let output = format_integrity_report(&report(60_000, 60_000), "Rs.");
        assert!(output.contains("Replayed balance: Rs.600.00"));
        assert!(output.contains("Ledger is consistent."));
    }

    #[test]
    fn test_inconsistent_report() {
        let mut bad = report(1, 60_000);
        bad.overdrawn_at = Some(TransactionId::new());
        let output = format_integrity_report(&bad, "Rs.");
        assert!(output.contains("INCONSISTENT"));
        assert!(output.contains("goes negative"));
    }

    #[test]
    fn test_balance_line() {
        let fund = Fund {
            balance: Money::from_cents(100_000),
            ..Fund::default()
        };
        assert!(format_balance(&fund, "Rs.").starts_with("Current balance: Rs.1,000.00\n"));
    }
}
