use crate::model::{Transaction, TransactionId, Transactions};
use crate::store::{Feed, Store};
use crate::Result;
use tokio::sync::{watch, Mutex};

/// Keeps the list in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: Mutex<Transactions>,
    feed: Feed,
}

impl MemoryStore {
    pub fn new(transactions: Transactions) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            feed: Feed::new(),
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Transactions> {
        let transactions = self.transactions.lock().await.clone();
        self.feed.publish(transactions.clone());
        Ok(transactions)
    }

    async fn append(&self, transaction: Transaction) -> Result<()> {
        let mut transactions = self.transactions.lock().await;
        transactions.push(transaction)?;
        self.feed.publish(transactions.clone());
        Ok(())
    }

    async fn delete(&self, id: &TransactionId) -> Result<bool> {
        let mut transactions = self.transactions.lock().await;
        let removed = transactions.remove(id).is_some();
        if removed {
            self.feed.publish(transactions.clone());
        }
        Ok(removed)
    }

    async fn replace(&self, replacement: Transactions) -> Result<()> {
        let mut transactions = self.transactions.lock().await;
        *transactions = replacement;
        self.feed.publish(transactions.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Transactions> {
        self.feed.subscribe()
    }
}
