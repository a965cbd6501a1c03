use crate::args::AddArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction};
use crate::present;
use crate::tracker::Tracker;
use crate::{Config, Result};
use chrono::NaiveDate;

/// Records a new transaction. The amount is stored negative for an expense and positive for
/// income; the date defaults to `today`.
pub async fn add(config: Config, args: &AddArgs, today: NaiveDate) -> Result<Out<Transaction>> {
    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;
    let entry = NewTransaction {
        text: args.text().trim().to_string(),
        magnitude: args.amount(),
        date: args.date().unwrap_or(today),
        category: args.category(),
        kind: args.kind(),
    };
    let added = tracker.add(entry).await?;
    let line = present::line(&added, config.currency());
    Ok(Out::new(format!("Added transaction {}", added.id()), added).with_text(line))
}
