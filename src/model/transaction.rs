use crate::model::category::lenient;
use crate::model::{Amount, Category, ReportKind, TxDate};
use crate::Result;
use anyhow::{bail, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// The opaque, unique identifier of a transaction.
///
/// Ids generated by this program are strings, but stored records may carry numeric ids. Both are
/// accepted on read and the id is always written back as a string.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh id for a transaction entered by the user.
    pub fn generate() -> Self {
        Self(format!("tx-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TransactionId(s),
            RawId::Integer(i) => TransactionId(i.to_string()),
            RawId::Float(f) => TransactionId(f.to_string()),
        })
    }
}

/// A single dated, signed, categorized monetary entry.
///
/// The serialized form is exactly `{id, text, amount, date, category}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    text: String,
    amount: Amount,
    date: TxDate,
    #[serde(default, deserialize_with = "lenient")]
    category: Category,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        text: impl Into<String>,
        amount: impl Into<Amount>,
        date: impl Into<TxDate>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            amount: amount.into(),
            date: date.into(),
            category,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> &TxDate {
        &self.date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_income()
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_expense()
    }
}

/// The data collected by the entry form before a transaction exists.
///
/// The magnitude is always entered as a positive number. Its sign comes from `kind`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTransaction {
    pub text: String,
    pub magnitude: Amount,
    pub date: NaiveDate,
    pub category: Option<Category>,
    pub kind: ReportKind,
}

impl NewTransaction {
    /// Validates the entry and turns it into a `Transaction` with a freshly generated id.
    ///
    /// # Errors
    /// - The text is empty or only whitespace.
    /// - The amount is zero.
    /// - The amount has more significant digits than a JSON number keeps.
    pub fn into_transaction(self) -> Result<Transaction> {
        ensure!(
            !self.text.trim().is_empty(),
            "A transaction needs a description"
        );
        ensure!(!self.magnitude.is_zero(), "A transaction amount cannot be zero");
        ensure!(
            self.magnitude.fits_json_number(),
            "The amount {} has more significant digits than can be stored",
            self.magnitude
        );
        let magnitude = self.magnitude.abs();
        let amount = match self.kind {
            ReportKind::Expense => -magnitude,
            ReportKind::Income => magnitude,
        };
        Ok(Transaction {
            id: TransactionId::generate(),
            text: self.text,
            amount,
            date: TxDate::Valid(self.date),
            category: self.category.unwrap_or_default(),
        })
    }
}

/// The active list of transactions.
///
/// Order is the order entries were loaded or appended in and carries no meaning. Views sort by
/// date (see `crate::engine::sorted_by_date_desc`).
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions(Vec<Transaction>);

impl Transactions {
    /// Creates a list, rejecting duplicate ids.
    pub fn new(data: Vec<Transaction>) -> Result<Self> {
        let mut list = Self::default();
        for t in data {
            list.push(t)?;
        }
        Ok(list)
    }

    pub fn data(&self) -> &[Transaction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.0.iter()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.0.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// Appends `transaction`.
    ///
    /// # Errors
    /// Returns an error if a transaction with the same id is already present.
    pub fn push(&mut self, transaction: Transaction) -> Result<()> {
        if self.contains(&transaction.id) {
            bail!("A transaction with id '{}' already exists", transaction.id);
        }
        self.0.push(transaction);
        Ok(())
    }

    /// Removes the one transaction whose id is `id` and returns it. Entries that look identical
    /// but have another id are left alone.
    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let ix = self.0.iter().position(|t| &t.id == id)?;
        Some(self.0.remove(ix))
    }

    pub fn into_inner(self) -> Vec<Transaction> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[Transaction]> for Transactions {
    fn as_ref(&self) -> &[Transaction] {
        &self.0
    }
}
