//! Configuration file handling.
//!
//! The configuration file is stored at `$MONEY_HOME/config.json`. It names the storage backend,
//! the currency symbol used for display, and how many backup copies to keep.

use crate::backup::Backup;
use crate::store::{self, Backend, Store};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "money-tracker";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_CURRENCY: &str = "฿";

/// The configuration of a money-tracker home directory. Load it with `Config::load`, or create a
/// new home with `Config::create`. It knows where the data file and the backups live and how to
/// open the configured `Store`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and its backups directory, writes an initial `config.json`, and
    /// initializes the data file for `backend`.
    ///
    /// # Arguments
    /// - `dir` - The home directory, e.g. `$HOME/money-tracker`. Created if it does not exist.
    /// - `backend` - Where transactions are stored.
    /// - `currency` - The currency symbol for display. Defaults to `฿`.
    /// - `backup_copies` - How many snapshots of each kind to keep. Defaults to 5.
    ///
    /// # Errors
    /// - The home directory already has a `config.json`.
    /// - Any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        backend: Backend,
        currency: Option<&str>,
        backup_copies: Option<u32>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if utils::exists(&config_path).await? {
            bail!(
                "'{}' is already initialized, the config file exists at '{}'",
                root.display(),
                config_path.display()
            );
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile {
            backend,
            currency: currency.unwrap_or(DEFAULT_CURRENCY).to_string(),
            backup_copies: backup_copies.unwrap_or(BACKUP_COPIES),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            backups,
            config_path,
            config_file,
        };

        // Leave an empty, valid data file behind so that the home is complete.
        let store = config.open_store().await?;
        let existing = store.load().await?;
        if backend == Backend::Json {
            store.replace(existing).await?;
        }
        Ok(config)
    }

    /// Validates that the home directory and its config file exist, loads the config file and
    /// checks that the backups directory is present.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run 'money init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'money init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backend(&self) -> Backend {
        self.config_file.backend
    }

    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// The data file. A relative `data_path` in the config file is resolved against the home
    /// directory. Without one, the backend's default file name in the home directory is used.
    pub fn data_path(&self) -> PathBuf {
        match &self.config_file.data_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => self.root.join(self.backend().file_name()),
        }
    }

    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Opens the configured backend.
    pub async fn open_store(&self) -> Result<Arc<dyn Store>> {
        store::open(self.backend(), &self.data_path()).await
    }
}

/// The serialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "money-tracker",
///   "config_version": 1,
///   "backend": "sqlite",
///   "currency": "฿",
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Should always be "money-tracker"
    app_name: String,

    config_version: u8,

    #[serde(default)]
    backend: Backend,

    #[serde(default = "default_currency")]
    currency: String,

    /// Number of backup copies to keep per kind of snapshot
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Path to the data file, relative to the home directory or absolute
    #[serde(skip_serializing_if = "Option::is_none")]
    data_path: Option<PathBuf>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend: Backend::default(),
            currency: default_currency(),
            backup_copies: BACKUP_COPIES,
            data_path: None,
        }
    }
}

impl ConfigFile {
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}
