//! Snapshots of the transaction list taken before destructive operations.

use crate::model::Transactions;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;
use tracing::debug;

/// Prefix for the snapshot taken before `import` replaces the list.
pub const IMPORT_PRE: &str = "import-pre";

/// Prefix for the snapshot taken before `delete` removes transactions.
pub const DELETE_PRE: &str = "delete-pre";

/// Writes dated JSON snapshots to the backups directory and keeps the newest `backup_copies` of
/// each kind.
///
/// File names look like `{prefix}.YYYY-MM-DD-NNN.json`, where `NNN` counts up within a day, so
/// sorting the names sorts the snapshots oldest first.
#[derive(Debug, Clone)]
pub struct Backup {
    dir: PathBuf,
    copies: u32,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.backups().to_path_buf(),
            copies: config.backup_copies(),
        }
    }

    /// Writes `transactions` as pretty JSON and removes the oldest snapshots with the same prefix
    /// beyond the configured number of copies. Returns the path of the new snapshot.
    pub async fn save_json(&self, prefix: &str, transactions: &Transactions) -> Result<PathBuf> {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let seq = self.next_sequence(prefix, &date).await?;
        let path = self.dir.join(format!("{prefix}.{date}-{seq:03}.json"));

        let json = serde_json::to_string_pretty(transactions)
            .context("Unable to serialize the backup")?;
        utils::write(&path, json).await?;
        debug!("Saved backup {}", path.display());

        self.rotate(prefix).await?;
        Ok(path)
    }

    async fn file_names(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Unable to read the backups directory")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_of(&name, prefix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn next_sequence(&self, prefix: &str, date: &str) -> Result<u32> {
        let max = self
            .file_names(prefix)
            .await?
            .iter()
            .filter_map(|name| sequence_of(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn rotate(&self, prefix: &str) -> Result<()> {
        let names = self.file_names(prefix).await?;
        let excess = names.len().saturating_sub(self.copies as usize);
        for name in names.into_iter().take(excess) {
            debug!("Removing old backup {name}");
            utils::remove(self.dir.join(name)).await?;
        }
        Ok(())
    }
}

/// The `NNN` of `{prefix}.{date}-NNN.json`, or `None` when `name` is not a snapshot of that prefix
/// and date.
fn sequence_of(name: &str, prefix: &str, date: &str) -> Option<u32> {
    name.strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_prefix(date)?
        .strip_prefix('-')?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_of(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.') && rest.ends_with(".json"))
}
