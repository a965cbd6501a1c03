//! Persistence for the transaction list.
//!
//! A `Store` is the only thing that writes transactions. Every successful change (and every
//! `load`) publishes the complete, current list to subscribers. There are no diffs: a receiver
//! always holds the whole list and the last one delivered wins.

mod json;
mod memory;
mod migrations;
mod sqlite;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::model::{Transaction, TransactionId, Transactions};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// The persistence collaborator that holds the list of transactions.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Reads the full list and publishes it to subscribers.
    async fn load(&self) -> Result<Transactions>;

    /// Appends `transaction` to the list.
    ///
    /// # Errors
    /// Returns an error if a transaction with the same id is already stored.
    async fn append(&self, transaction: Transaction) -> Result<()>;

    /// Removes the transaction with id `id`. Returns `false`, and changes nothing, when there is no
    /// such transaction.
    async fn delete(&self, id: &TransactionId) -> Result<bool>;

    /// Replaces the whole list.
    async fn replace(&self, transactions: Transactions) -> Result<()>;

    /// Returns a receiver that is updated with the full list after every change.
    fn subscribe(&self) -> watch::Receiver<Transactions>;
}

/// The kind of `Store` a home directory is configured with.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// A single JSON array file.
    #[default]
    Json,
    /// A SQLite database.
    Sqlite,
}

serde_plain::derive_display_from_serialize!(Backend);
serde_plain::derive_fromstr_from_deserialize!(Backend);

impl Backend {
    /// The default data file name for this backend inside the home directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Backend::Json => "transactions.json",
            Backend::Sqlite => "transactions.sqlite",
        }
    }
}

/// Opens the store for `backend` with its data at `path`.
pub async fn open(backend: Backend, path: &Path) -> Result<Arc<dyn Store>> {
    debug!("Opening {backend} store at {}", path.display());
    let store: Arc<dyn Store> = match backend {
        Backend::Json => Arc::new(JsonStore::new(path)),
        Backend::Sqlite => Arc::new(SqliteStore::open(path).await?),
    };
    Ok(store)
}

/// The sending side of a store's subscription.
#[derive(Debug)]
pub(crate) struct Feed {
    sender: watch::Sender<Transactions>,
}

impl Feed {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(Transactions::default());
        Self { sender }
    }

    /// Delivers `transactions` to every receiver, replacing whatever they had not yet seen.
    pub(crate) fn publish(&self, transactions: Transactions) {
        self.sender.send_replace(transactions);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Transactions> {
        self.sender.subscribe()
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}
