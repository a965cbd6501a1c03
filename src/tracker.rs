//! The owning layer between a `Store` and the engine.
//!
//! The engine never holds the list. `Tracker` keeps the latest list delivered by the store's
//! subscription, forwards changes to the store, and runs the engine against whatever list it has
//! most recently received.
//!
//! Errors returned from here are tagged with an `ErrorType`: `Input` for entries that fail
//! validation and ids that do not exist, `Storage` for everything the store reports.

use crate::engine::{self, Dashboard};
use crate::model::{
    FilterSelection, NewTransaction, ReportSelection, Transaction, TransactionId, Transactions,
};
use crate::error::{ErrorType, IntoResult};
use crate::store::Store;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct Tracker {
    store: Arc<dyn Store>,
    updates: watch::Receiver<Transactions>,
}

impl Tracker {
    /// Subscribes to `store` and loads the current list.
    pub async fn open(store: Arc<dyn Store>) -> Result<Self> {
        let mut updates = store.subscribe();
        store
            .load()
            .await
            .context("Unable to load transactions")
            .pub_result(ErrorType::Storage)?;
        // The load above has been delivered; only later changes should wake `changed`.
        drop(updates.borrow_and_update());
        Ok(Self { store, updates })
    }

    /// The most recently delivered list.
    pub fn transactions(&self) -> Transactions {
        self.updates.borrow().clone()
    }

    /// Validates `entry`, gives it a fresh id and appends it. The list held here changes only when
    /// the store delivers it.
    pub async fn add(&self, entry: NewTransaction) -> Result<Transaction> {
        let transaction = entry.into_transaction().pub_result(ErrorType::Input)?;
        self.store
            .append(transaction.clone())
            .await
            .pub_result(ErrorType::Storage)?;
        debug!("Added transaction {}", transaction.id());
        Ok(transaction)
    }

    /// Removes the transaction with id `id`. Returns `false` if there is none.
    pub async fn remove(&self, id: &TransactionId) -> Result<bool> {
        self.store.delete(id).await.pub_result(ErrorType::Storage)
    }

    /// Removes every transaction in `ids`, or none of them if any id is unknown. Returns the
    /// removed transactions.
    pub async fn remove_all(&self, ids: &[TransactionId]) -> Result<Vec<Transaction>> {
        let mut remaining = self.store.load().await.pub_result(ErrorType::Storage)?;
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            let transaction = remaining
                .remove(id)
                .with_context(|| format!("Transaction not found: '{id}'"))
                .pub_result(ErrorType::Input)?;
            removed.push(transaction);
        }
        self.store
            .replace(remaining)
            .await
            .pub_result(ErrorType::Storage)?;
        Ok(removed)
    }

    /// Replaces the whole list.
    pub async fn replace(&self, transactions: Transactions) -> Result<()> {
        self.store
            .replace(transactions)
            .await
            .pub_result(ErrorType::Storage)
    }

    /// Waits for the store to deliver a new list and returns it.
    pub async fn changed(&mut self) -> Result<Transactions> {
        self.updates
            .changed()
            .await
            .context("The store is no longer publishing updates")
            .pub_result(ErrorType::Storage)?;
        Ok(self.updates.borrow_and_update().clone())
    }

    /// Runs `engine::dashboard` against the latest list and hands the result to `f`.
    pub fn dashboard<R>(
        &self,
        filter: &FilterSelection,
        report: &ReportSelection,
        now: NaiveDate,
        f: impl FnOnce(Dashboard<'_>) -> R,
    ) -> R {
        let transactions = self.updates.borrow();
        f(engine::dashboard(transactions.data(), filter, report, now))
    }
}
