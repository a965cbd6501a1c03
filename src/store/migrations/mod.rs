//! Schema migrations for the SQLite backend.
//!
//! Each schema version `N` has a pair of files next to this module:
//! - `migration_NN_up.sql` moves the schema from `N-1` to `N`
//! - `migration_NN_down.sql` moves it back from `N` to `N-1`
//!
//! The version a database is at is the single row of the `schema_version` table.

use crate::Result;
use anyhow::{bail, Context};
use sqlx::SqlitePool;
use tracing::debug;

/// The schema version this build of the program reads and writes.
pub(crate) const CURRENT_VERSION: i32 = 1;

struct Migration {
    version: i32,
    up: &'static str,
    down: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up: include_str!("migration_01_up.sql"),
    down: include_str!("migration_01_down.sql"),
}];

/// Returns the schema version of the database, creating the `schema_version` table at version 0
/// if this is a new database.
pub(crate) async fn version(pool: &SqlitePool) -> Result<i32> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await
        .context("Unable to create the schema_version table")?;
    let (version,): (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Unable to read the schema version")?;
    match version {
        Some(v) => Ok(v),
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                .execute(pool)
                .await
                .context("Unable to initialize the schema version")?;
            Ok(0)
        }
    }
}

/// Moves the schema from version `from` to version `to`, one migration at a time. Each step runs in
/// its own database transaction together with the `schema_version` update, so a failed step
/// leaves the database at the previous version.
pub(crate) async fn run(pool: &SqlitePool, from: i32, to: i32) -> Result<()> {
    if from == to {
        debug!("Schema is at version {to}");
        return Ok(());
    }
    check_available(from, to)?;

    if from < to {
        for version in (from + 1)..=to {
            debug!("Migrating schema up to version {version}");
            step(pool, find(version)?.up, version).await?;
        }
    } else {
        for version in ((to + 1)..=from).rev() {
            debug!("Migrating schema down from version {version}");
            step(pool, find(version)?.down, version - 1).await?;
        }
    }
    Ok(())
}

fn find(version: i32) -> Result<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .with_context(|| format!("There is no migration for schema version {version}"))
}

async fn step(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Unable to begin a migration transaction")?;
    sqlx::raw_sql(sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Migration to schema version {new_version} failed"))?;
    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Unable to update the schema version")?;
    tx.commit()
        .await
        .context("Unable to commit the migration transaction")
}

fn check_available(from: i32, to: i32) -> Result<()> {
    let (low, high) = if from < to { (from + 1, to) } else { (to + 1, from) };
    for version in low..=high {
        if !MIGRATIONS.iter().any(|m| m.version == version) {
            bail!("Cannot migrate the schema from version {from} to {to}: version {version} is unknown");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn pool() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("test.sqlite"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        (dir, pool)
    }

    async fn has_table(pool: &SqlitePool, name: &str) -> bool {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_one(pool)
                .await
                .unwrap();
        n > 0
    }

    #[tokio::test]
    async fn test_new_database_starts_at_zero() {
        let (_dir, pool) = pool().await;
        assert_eq!(version(&pool).await.unwrap(), 0);
        // Asking again does not add a second row.
        assert_eq!(version(&pool).await.unwrap(), 0);
        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_up_and_down() {
        let (_dir, pool) = pool().await;
        let v = version(&pool).await.unwrap();
        run(&pool, v, CURRENT_VERSION).await.unwrap();
        assert_eq!(version(&pool).await.unwrap(), CURRENT_VERSION);
        assert!(has_table(&pool, "transactions").await);

        run(&pool, CURRENT_VERSION, 0).await.unwrap();
        assert_eq!(version(&pool).await.unwrap(), 0);
        assert!(!has_table(&pool, "transactions").await);
    }

    #[tokio::test]
    async fn test_same_version_is_no_op() {
        let (_dir, pool) = pool().await;
        version(&pool).await.unwrap();
        run(&pool, 0, 1).await.unwrap();
        run(&pool, 1, 1).await.unwrap();
        assert_eq!(version(&pool).await.unwrap(), 1);
    }

    #[test]
    fn test_check_available() {
        assert!(check_available(0, 1).is_ok());
        assert!(check_available(1, 0).is_ok());
        assert!(check_available(0, 2).is_err());
        assert!(check_available(3, 1).is_err());
    }
}
