//! The aggregation engine: pure functions that derive every view of the app from the current list
//! of transactions and the user's selections.
//!
//! Nothing in here keeps state between calls, performs I/O, or modifies its input. Callers own the
//! list and pass a fresh snapshot each time.

mod period;
mod summary;
mod totals;
mod week;

pub use period::{filter_by_period, filter_by_report};
pub use summary::{compute_summary, Summary};
pub use totals::{category_totals, top_category, CategoryTotals, Insight};
pub use week::iso_week;

use crate::model::{FilterSelection, ReportKind, ReportSelection, Transaction};
use chrono::NaiveDate;
use serde::Serialize;

/// Returns `transactions` ordered newest first. Transactions on the same day keep their relative
/// order, and transactions with invalid dates come last.
pub fn sorted_by_date_desc<'a, I>(transactions: I) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    sorted.sort_by(|a, b| a.date().cmp_newest_first(b.date()));
    sorted
}

/// The category report: where money went (or came from) within the report's window.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub totals: CategoryTotals,
    pub insight: Option<Insight>,
}

/// Everything the main screen shows, derived from one snapshot of the list.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard<'a> {
    /// The balance view's transactions, newest first.
    pub transactions: Vec<&'a Transaction>,
    pub summary: Summary,
    pub report: Report,
}

/// Builds the category report for `selection`.
pub fn report<'a, I>(transactions: I, selection: &ReportSelection, now: NaiveDate) -> Report
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let totals = category_totals(filter_by_report(transactions, selection, now));
    let insight = top_category(&totals);
    Report {
        kind: selection.kind,
        totals,
        insight,
    }
}

/// Computes the balance view and the category report. The two selections are applied
/// independently to the same list.
pub fn dashboard<'a>(
    transactions: &'a [Transaction],
    filter: &FilterSelection,
    report_selection: &ReportSelection,
    now: NaiveDate,
) -> Dashboard<'a> {
    let visible = filter_by_period(transactions, filter, now);
    let summary = compute_summary(visible.iter().copied());
    Dashboard {
        transactions: sorted_by_date_desc(visible),
        summary,
        report: report(transactions, report_selection, now),
    }
}
