//! Transaction display formatting
//!
//! Tables for listings and a detail view for a single entry.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;

/// One row of a transaction listing
#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn from_transaction(txn: &Transaction, currency_symbol: &str) -> Self {
        Self {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            name: truncate(&txn.name, 24),
            category: txn.category.label().to_string(),
            department: txn.department.label().to_string(),
            status: txn.status.to_string(),
            amount: txn.signed_amount().format_with_symbol(currency_symbol),
        }
    }
}

/// Format transactions as a table
pub fn format_transaction_table(transactions: &[Transaction], currency_symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<_> = transactions
        .iter()
        .map(|t| TransactionRow::from_transaction(t, currency_symbol))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    posted_by: Option<&str>,
    currency_symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.as_uuid()));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Name:        {}\n", txn.name));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Department:  {}\n", txn.department));
    output.push_str(&format!("Status:      {}\n", txn.status));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    if let Some(receipt) = &txn.receipt_path {
        output.push_str(&format!("Receipt:     {}\n", receipt));
    }

    match posted_by {
        Some(username) => output.push_str(&format!("Posted by:   {}\n", username)),
        None => output.push_str(&format!("Posted by:   {}\n", txn.user_id)),
    }
    output.push_str(&format!(
        "Posted at:   {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
