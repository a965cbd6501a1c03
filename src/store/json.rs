use crate::model::{Transaction, TransactionId, Transactions};
use crate::store::{Feed, Store};
use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};
use tracing::{debug, trace};

/// Stores the list as a single JSON array of transaction records.
///
/// A missing file is an empty list. Each write goes to a temporary file next to the target, which
/// is then renamed over it, so a crash never leaves a half-written list behind.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
    feed: Feed,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            feed: Feed::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Transactions> {
        if !utils::exists(&self.path).await? {
            trace!("{} does not exist yet", self.path.display());
            return Ok(Transactions::default());
        }
        utils::deserialize(&self.path).await
    }

    async fn write(&self, transactions: &Transactions) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)
            .context("Unable to serialize transactions")?;
        let tmp = temp_path(&self.path);
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await?;
        debug!(
            "Wrote {} transactions to {}",
            transactions.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn commit(&self, transactions: Transactions) -> Result<()> {
        self.write(&transactions).await?;
        self.feed.publish(transactions);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for JsonStore {
    async fn load(&self) -> Result<Transactions> {
        let _guard = self.lock.lock().await;
        let transactions = self.read().await?;
        self.feed.publish(transactions.clone());
        Ok(transactions)
    }

    async fn append(&self, transaction: Transaction) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut transactions = self.read().await?;
        transactions.push(transaction)?;
        self.commit(transactions).await
    }

    async fn delete(&self, id: &TransactionId) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut transactions = self.read().await?;
        if transactions.remove(id).is_none() {
            return Ok(false);
        }
        self.commit(transactions).await?;
        Ok(true)
    }

    async fn replace(&self, transactions: Transactions) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.commit(transactions).await
    }

    fn subscribe(&self) -> watch::Receiver<Transactions> {
        self.feed.subscribe()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
