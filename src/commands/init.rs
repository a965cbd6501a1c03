use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the home directory, its `config.json`, the backups directory and an empty data file
/// for the chosen backend. Returns the path of the data file.
///
/// # Errors
/// - The home directory is already initialized.
/// - Any file operation fails.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<PathBuf>> {
    let config = Config::create(
        home,
        args.backend(),
        args.currency(),
        args.backup_copies(),
    )
    .await
    .context("Unable to create the home directory and config")
    .pub_result(ErrorType::Config)?;
    let data = config.data_path();
    Ok(Out::new(
        format!(
            "Initialized '{}' with the {} backend",
            config.root().display(),
            config.backend()
        ),
        data,
    ))
}
