//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Category, Transaction, Transactions, TxDate};
use crate::store::Backend;
use crate::Config;
use chrono::NaiveDate;
use tempfile::TempDir;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A list that spans two months and includes one transaction with an unparsable date.
///
/// | id     | date         | amount | category  |
/// |--------|--------------|--------|-----------|
/// | t-rent | 2024-04-01   | -9000  | utilities |
/// | t-pay  | 2024-04-25   | 30000  | salary    |
/// | t-food | 2024-05-02   | -300   | food      |
/// | t-bus  | 2024-05-03   | -100   | transport |
/// | t-gift | 2024-05-06   | 500    | other     |
/// | t-bad  | unknown date | -7     | other     |
pub fn sample() -> Transactions {
    Transactions::new(vec![
        Transaction::new("t-rent", "Rent", -9000, ymd(2024, 4, 1), Category::Utilities),
        Transaction::new("t-pay", "Salary", 30000, ymd(2024, 4, 25), Category::Salary),
        Transaction::new("t-food", "Groceries", -300, ymd(2024, 5, 2), Category::Food),
        Transaction::new("t-bus", "Bus pass", -100, ymd(2024, 5, 3), Category::Transport),
        Transaction::new("t-gift", "Birthday gift", 500, ymd(2024, 5, 6), Category::Other),
        Transaction::new(
            "t-bad",
            "Old receipt",
            -7,
            TxDate::parse("unknown date"),
            Category::Other,
        ),
    ])
    .unwrap()
}

pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// An initialized home using the JSON backend.
    pub async fn new() -> Self {
        Self::with_backend(Backend::Json).await
    }

    pub async fn with_backend(backend: Backend) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("money");
        let config = Config::create(&root, backend, None, Some(3))
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// One environment per backend.
    pub async fn all() -> Vec<Self> {
        vec![
            Self::with_backend(Backend::Json).await,
            Self::with_backend(Backend::Sqlite).await,
        ]
    }

    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Reads the stored list.
    pub async fn load(&self) -> Transactions {
        let store = self.config.open_store().await.unwrap();
        store.load().await.unwrap()
    }

    /// Stores `sample()` and returns it.
    pub async fn seed(&self) -> Transactions {
        let list = sample();
        let store = self.config.open_store().await.unwrap();
        store.replace(list.clone()).await.unwrap();
        list
    }
}
