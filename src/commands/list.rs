use crate::args::PeriodArgs;
use crate::commands::Out;
use crate::engine::Summary;
use crate::error::{ErrorType, IntoResult};
use crate::model::{ReportSelection, Transaction};
use crate::present;
use crate::tracker::Tracker;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// The balance view: the transactions in the selected period, newest first, and their totals.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

/// Lists the transactions of the selected period, newest first, followed by the period's
/// balance, income and expense.
pub async fn list(config: Config, args: &PeriodArgs, now: NaiveDate) -> Result<Out<Listing>> {
    let listing = listing(&config, args, now).await?;
    let symbol = config.currency();

    let mut text = String::new();
    for t in &listing.transactions {
        let _ = writeln!(text, "{}", present::line(t, symbol));
    }
    if listing.transactions.is_empty() {
        text.push_str("No transactions\n");
    }
    text.push('\n');
    text.push_str(&summary_text(&listing.summary, symbol));

    let count = listing.transactions.len();
    Ok(Out::new(
        format!(
            "Listed {} transaction{}",
            count,
            if count == 1 { "" } else { "s" }
        ),
        listing,
    )
    .with_text(text))
}

/// Shows balance, income and expense of the selected period.
pub async fn summary(config: Config, args: &PeriodArgs, now: NaiveDate) -> Result<Out<Summary>> {
    let listing = listing(&config, args, now).await?;
    let text = summary_text(&listing.summary, config.currency());
    Ok(Out::new(
        format!("Balance {}", present::money(listing.summary.balance, config.currency())),
        listing.summary,
    )
    .with_text(text))
}

async fn listing(config: &Config, args: &PeriodArgs, now: NaiveDate) -> Result<Listing> {
    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;
    let filter = args.selection();
    Ok(
        tracker.dashboard(&filter, &ReportSelection::default(), now, |d| Listing {
            transactions: d.transactions.into_iter().cloned().collect(),
            summary: d.summary,
        }),
    )
}

fn summary_text(summary: &Summary, symbol: &str) -> String {
    format!(
        "Balance  {:>16}\nIncome   {:>16}\nExpense  {:>16}\n",
        present::money(summary.balance, symbol),
        present::signed_money(summary.income, symbol),
        present::money(-summary.expense, symbol),
    )
}
