use crate::args::DeleteArgs;
use crate::backup::DELETE_PRE;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::TransactionId;
use crate::tracker::Tracker;
use crate::{Config, Result};
use tracing::debug;

/// Deletes one or more transactions by id.
///
/// This is all-or-nothing: if any id does not exist, nothing is deleted. The list is backed up
/// before anything is removed.
pub async fn delete(config: Config, args: &DeleteArgs) -> Result<Out<Vec<String>>> {
    let ids: Vec<TransactionId> = args.ids().iter().map(TransactionId::new).collect();
    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;

    let current = tracker.transactions();
    if let Some(missing) = ids.iter().find(|id| !current.contains(id)) {
        return Err(anyhow::anyhow!("Transaction not found: '{missing}'"))
            .pub_result(ErrorType::Input);
    }
    let backup = config
        .backup()
        .save_json(DELETE_PRE, &current)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Backed up {} transactions to {}", current.len(), backup.display());

    let removed = tracker.remove_all(&ids).await?;
    let deleted: Vec<String> = removed.iter().map(|t| t.id().to_string()).collect();
    let count = deleted.len();
    let message = format!(
        "Deleted {} transaction{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_one() {
        for env in TestEnv::all().await {
            let seeded = env.seed().await;
            let out = delete(env.config(), &DeleteArgs::new(["t-food"]))
                .await
                .unwrap();
            assert_eq!(out.message(), "Deleted 1 transaction");
            assert_eq!(out.structure().unwrap(), &vec!["t-food".to_string()]);

            let left = env.load().await;
            assert_eq!(left.len(), seeded.len() - 1);
            assert!(!left.contains(&TransactionId::from("t-food")));
        }
    }

    #[tokio::test]
    async fn test_delete_multiple() {
        let env = TestEnv::new().await;
        env.seed().await;
        let out = delete(env.config(), &DeleteArgs::new(["t-bus", "t-bad"]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 2 transactions");
        assert_eq!(env.load().await.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_deletes_nothing() {
        for env in TestEnv::all().await {
            env.seed().await;
            let err = delete(env.config(), &DeleteArgs::new(["t-food", "nope"]))
                .await
                .unwrap_err();
            assert_eq!(error_type(&err), Some(ErrorType::Input));
            assert!(format!("{err:#}").contains("Transaction not found: 'nope'"));
            assert!(env.load().await.contains(&TransactionId::from("t-food")));
        }
    }

    #[tokio::test]
    async fn test_delete_takes_backup() {
        let env = TestEnv::new().await;
        env.seed().await;
        delete(env.config(), &DeleteArgs::new(["t-gift"]))
            .await
            .unwrap();
        let mut entries = std::fs::read_dir(env.config().backups()).unwrap();
        let name = entries
            .next()
            .unwrap()
            .unwrap()
            .file_name()
            .to_string_lossy()
            .to_string();
        assert!(name.starts_with("delete-pre."), "{name}");
    }
}
