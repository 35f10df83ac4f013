//! Summary Report
//!
//! The printable financial summary: a title, the income and expense
//! breakdowns, and when it was generated. Laid out as styled lines so the
//! terminal and PDF renderers share one layout.

use chrono::{Local, NaiveDateTime};

use crate::error::LedgerResult;
use crate::models::TransactionKind;
use crate::storage::Storage;

use super::breakdown::{format_share, CategoryBreakdown};

/// Typographic role of a summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
    Footnote,
}

/// One line of the summary layout
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub style: LineStyle,
    pub text: String,
    /// Extra vertical space before the line, in points
    pub space_before: f32,
}

impl SummaryLine {
    fn new(style: LineStyle, text: impl Into<String>, space_before: f32) -> Self {
        Self {
            style,
            text: text.into(),
            space_before,
        }
    }
}

/// Income and expense breakdowns under one title
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub title: String,
    pub income: CategoryBreakdown,
    pub expense: CategoryBreakdown,
    /// Local time the report was produced
    pub generated_at: NaiveDateTime,
}

impl SummaryReport {
    /// Assemble a report from precomputed breakdowns
    pub fn new(
        title: impl Into<String>,
        income: CategoryBreakdown,
        expense: CategoryBreakdown,
    ) -> Self {
        Self {
            title: title.into(),
            income,
            expense,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Break down everything in storage
    pub fn generate(storage: &Storage, title: impl Into<String>) -> LedgerResult<Self> {
        let transactions = storage.ledger.get_all()?;
        Ok(Self::new(
            title,
            CategoryBreakdown::from_transactions(TransactionKind::Income, &transactions)?,
            CategoryBreakdown::from_transactions(TransactionKind::Expense, &transactions)?,
        ))
    }

    /// Lay the report out as styled lines
    pub fn lines(&self, currency_symbol: &str) -> Vec<SummaryLine> {
        let mut lines = vec![SummaryLine::new(LineStyle::Title, self.title.clone(), 0.0)];

        section(&mut lines, &self.income, "Income", "Total Income", currency_symbol, 12.0);
        section(&mut lines, &self.expense, "Expense", "Total Expenses", currency_symbol, 24.0);

        lines.push(SummaryLine::new(
            LineStyle::Footnote,
            format!(
                "Report generated on: {}",
                self.generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
            36.0,
        ));

        lines
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        for line in self.lines(currency_symbol) {
            if line.space_before > 0.0 {
                output.push('\n');
            }
            output.push_str(&line.text);
            output.push('\n');
            match line.style {
                LineStyle::Title => {
                    output.push_str(&"=".repeat(line.text.chars().count()));
                    output.push('\n');
                }
                LineStyle::Heading => {
                    output.push_str(&"-".repeat(line.text.chars().count()));
                    output.push('\n');
                }
                LineStyle::Body | LineStyle::Footnote => {}
            }
        }

        output
    }
}

fn section(
    lines: &mut Vec<SummaryLine>,
    breakdown: &CategoryBreakdown,
    label: &str,
    total_label: &str,
    currency_symbol: &str,
    space_before: f32,
) {
    lines.push(SummaryLine::new(
        LineStyle::Heading,
        format!("{} Breakdown", label),
        space_before,
    ));

    if breakdown.is_empty() {
        lines.push(SummaryLine::new(
            LineStyle::Body,
            format!("No {} data available", label.to_lowercase()),
            0.0,
        ));
        return;
    }

    lines.push(SummaryLine::new(
        LineStyle::Body,
        format!(
            "{}: {}",
            total_label,
            breakdown.total.format_with_symbol(currency_symbol)
        ),
        0.0,
    ));

    for (i, row) in breakdown.rows.iter().enumerate() {
        lines.push(SummaryLine::new(
            LineStyle::Body,
            format!(
                "{}: {} ({})",
                row.category.label(),
                row.total.format_with_symbol(currency_symbol),
                format_share(row.percentage)
            ),
            if i == 0 { 12.0 } else { 0.0 },
        ));
    }
}
