use crate::args::ImportArgs;
use crate::backup::IMPORT_PRE;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Transactions;
use crate::tracker::Tracker;
use crate::{utils, Config, Result};
use anyhow::Context;
use tracing::{debug, warn};

/// Replaces the whole list with the JSON array in the import file. The current list is backed up
/// first. Returns the number of imported transactions.
///
/// # Errors
/// - The file cannot be read, is not a JSON array of transactions, or has duplicate ids.
pub async fn import(config: Config, args: &ImportArgs) -> Result<Out<usize>> {
    let path = args.file();
    let parsed: Transactions = utils::deserialize(path)
        .await
        .pub_result(ErrorType::Input)?;
    let incoming = Transactions::new(parsed.into_inner())
        .with_context(|| format!("Unable to import {}", path.display()))
        .pub_result(ErrorType::Input)?;
    let invalid = incoming.iter().filter(|t| !t.date().is_valid()).count();
    if invalid > 0 {
        warn!("{invalid} imported transactions have a date that cannot be read");
    }

    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;
    let current = tracker.transactions();
    let backup = config
        .backup()
        .save_json(IMPORT_PRE, &current)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Backed up {} transactions to {}", current.len(), backup.display());

    let count = incoming.len();
    tracker.replace(incoming).await?;
    Ok(Out::new(
        format!("Imported {count} transactions from {}", path.display()),
        count,
    ))
}
