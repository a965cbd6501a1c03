//! Turning engine output into text: category labels and icons, money formatting, list lines,
//! the insight sentence and CSV export.

use crate::engine::{Insight, Report};
use crate::model::{round2, Category, ReportKind, Transaction};
use crate::Result;
use anyhow::Context;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// How a category is shown.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct CategoryStyle {
    pub label: &'static str,
    pub icon: &'static str,
    /// CSS hex color.
    pub color: &'static str,
}

const STYLES: [(Category, CategoryStyle); 8] = [
    (Category::Food, style("Food", "🍔", "#f59e0b")),
    (Category::Transport, style("Transport", "🚕", "#3b82f6")),
    (Category::Utilities, style("Utilities", "💡", "#eab308")),
    (Category::Shopping, style("Shopping", "🛍️", "#ec4899")),
    (Category::Entertainment, style("Entertainment", "🎬", "#8b5cf6")),
    (Category::Salary, style("Salary", "💰", "#10b981")),
    (Category::Business, style("Business", "💼", "#06b6d4")),
    (Category::Other, style("Other", "📝", "#64748b")),
];

const fn style(label: &'static str, icon: &'static str, color: &'static str) -> CategoryStyle {
    CategoryStyle { label, icon, color }
}

/// Chart slice colors for expense reports, used in category order and repeated as needed.
pub const EXPENSE_PALETTE: [&str; 6] = [
    "#f59e0b", "#ef4444", "#f97316", "#eab308", "#dc2626", "#78350f",
];

/// Chart slice colors for income reports.
pub const INCOME_PALETTE: [&str; 6] = [
    "#10b981", "#3b82f6", "#06b6d4", "#6366f1", "#059669", "#1d4ed8",
];

pub fn category_style(category: Category) -> CategoryStyle {
    STYLES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, s)| *s)
        .unwrap_or(STYLES[STYLES.len() - 1].1)
}

pub fn palette(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Expense => &EXPENSE_PALETTE,
        ReportKind::Income => &INCOME_PALETTE,
    }
}

/// One slice of the category chart.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct ChartSlice {
    pub category: Category,
    pub label: &'static str,
    pub icon: &'static str,
    /// The category's own color, as used for its badge.
    pub badge_color: &'static str,
    /// The slice's fill, taken from the report kind's palette.
    pub slice_color: &'static str,
    pub total: Decimal,
}

/// The chart slices of `report`, in the order of its category totals. Palette colors repeat when
/// there are more categories than colors.
pub fn chart_slices(report: &Report) -> Vec<ChartSlice> {
    let colors = palette(report.kind);
    report
        .totals
        .iter()
        .zip(colors.iter().cycle())
        .map(|((category, total), slice_color)| {
            let style = category_style(category);
            ChartSlice {
                category,
                label: style.label,
                icon: style.icon,
                badge_color: style.color,
                slice_color: *slice_color,
                total,
            }
        })
        .collect()
}

/// Formats `value` with two decimals, thousands separators and the currency `symbol`, e.g.
/// `-฿1,234.50`.
pub fn money(value: Decimal, symbol: &str) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs().to_f64().unwrap_or_default();
    format!("{sign}{symbol}{}", format_num::format_num!(",.2f", abs))
}

/// Like `money`, but positive values carry a `+`.
pub fn signed_money(value: Decimal, symbol: &str) -> String {
    if value > Decimal::ZERO {
        format!("+{}", money(value, symbol))
    } else {
        money(value, symbol)
    }
}

/// One line of the transaction list: date, category, description and signed amount.
pub fn line(transaction: &Transaction, symbol: &str) -> String {
    let style = category_style(transaction.category());
    format!(
        "{:<10}  {} {:<13}  {:<24}  {:>14}  [{}]",
        transaction.date().to_string(),
        style.icon,
        style.label,
        transaction.text(),
        signed_money(transaction.amount().value(), symbol),
        transaction.id(),
    )
}

/// The sentence shown under the category report.
pub fn insight_message(insight: &Insight, kind: ReportKind, symbol: &str) -> String {
    let label = category_style(insight.category).label;
    let total = money(insight.total, symbol);
    match kind {
        ReportKind::Expense => format!(
            "You spend the most on {label}: {total}, {}% of your expenses",
            insight.percent
        ),
        ReportKind::Income => format!(
            "Most of your income comes from {label}: {total}, {}% of your income",
            insight.percent
        ),
    }
}

/// What the report says when there is nothing to report.
pub fn empty_report_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Expense => "No expenses in this period",
        ReportKind::Income => "No income in this period",
    }
}

const CSV_HEADER: [&str; 5] = ["id", "date", "text", "category", "amount"];

/// Writes `transactions` as CSV with a header row `id,date,text,category,amount`.
pub fn write_csv<'a, W, I>(writer: W, transactions: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)
        .context("Unable to write the CSV header")?;
    for t in transactions {
        let date = t.date().to_string();
        let category = t.category().to_string();
        let amount = t.amount().to_string();
        csv.write_record([
            t.id().as_str(),
            date.as_str(),
            t.text(),
            category.as_str(),
            amount.as_str(),
        ])
        .with_context(|| format!("Unable to write transaction '{}' as CSV", t.id()))?;
    }
    csv.flush().context("Unable to flush CSV output")?;
    Ok(())
}
