use crate::model::{Amount, Category, Transaction, TransactionId, Transactions, TxDate};
use crate::store::{migrations, Feed, Store};
use crate::Result;
use anyhow::{bail, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteExecutor, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::watch;
use tracing::{debug, trace};

/// The columns of one row of the `transactions` table, in `SELECT` order.
type Row = (String, String, String, String, String);

/// Stores the list in a SQLite database. Rows are kept in insertion order by an autoincrement
/// `seq` column; `id` is unique.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    pool: SqlitePool,
    feed: Feed,
}

impl SqliteStore {
    /// Opens the database at `path`, creating it if needed, and brings its schema up to date.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Unable to open the database at {}", path.display()))?;

        let version = migrations::version(&pool).await?;
        migrations::run(&pool, version, migrations::CURRENT_VERSION)
            .await
            .with_context(|| format!("Unable to migrate the database at {}", path.display()))?;

        Ok(Self {
            path,
            pool,
            feed: Feed::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads the whole list in insertion order. Mutations read inside their database transaction, so
/// the list they publish is the one they commit, and a failed read rolls the change back.
async fn read<'e, E>(executor: E) -> Result<Transactions>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<Row> =
        sqlx::query_as("SELECT id, text, amount, date, category FROM transactions ORDER BY seq")
            .fetch_all(executor)
            .await
            .context("Unable to read transactions")?;
    trace!("Read {} rows", rows.len());
    let transactions = rows
        .into_iter()
        .map(from_row)
        .collect::<Result<Vec<_>>>()?;
    Transactions::new(transactions)
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn load(&self) -> Result<Transactions> {
        let transactions = read(&self.pool).await?;
        self.feed.publish(transactions.clone());
        Ok(transactions)
    }

    async fn append(&self, transaction: Transaction) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin a database transaction")?;
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE id = ?")
            .bind(transaction.id().as_str())
            .fetch_one(&mut *tx)
            .await
            .context("Unable to look up the transaction id")?;
        if existing > 0 {
            bail!("A transaction with id '{}' already exists", transaction.id());
        }
        insert(&mut tx, &transaction).await?;
        let transactions = read(&mut *tx).await?;
        tx.commit()
            .await
            .context("Unable to commit the new transaction")?;
        debug!("Appended transaction {}", transaction.id());
        self.feed.publish(transactions);
        Ok(())
    }

    async fn delete(&self, id: &TransactionId) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin a database transaction")?;
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to delete transaction '{id}'"))?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        let transactions = read(&mut *tx).await?;
        tx.commit()
            .await
            .with_context(|| format!("Unable to commit the deletion of '{id}'"))?;
        self.feed.publish(transactions);
        Ok(true)
    }

    async fn replace(&self, transactions: Transactions) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin a database transaction")?;
        sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await
            .context("Unable to clear transactions")?;
        for transaction in &transactions {
            insert(&mut tx, transaction).await?;
        }
        tx.commit()
            .await
            .context("Unable to commit the replacement list")?;
        debug!("Replaced the list with {} transactions", transactions.len());
        self.feed.publish(transactions);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Transactions> {
        self.feed.subscribe()
    }
}

async fn insert(tx: &mut sqlx::Transaction<'_, Sqlite>, transaction: &Transaction) -> Result<()> {
    sqlx::query(
        "INSERT INTO transactions (id, text, amount, date, category) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(transaction.id().as_str())
    .bind(transaction.text())
    .bind(transaction.amount().to_string())
    .bind(transaction.date().to_string())
    .bind(transaction.category().to_string())
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Unable to insert transaction '{}'", transaction.id()))?;
    Ok(())
}

fn from_row(row: Row) -> Result<Transaction> {
    let (id, text, amount, date, category) = row;
    let amount = Amount::from_str(&amount)
        .with_context(|| format!("Transaction '{id}' has an invalid amount '{amount}'"))?;
    Ok(Transaction::new(
        id,
        text,
        amount,
        TxDate::parse(&date),
        Category::from_key(&category),
    ))
}
