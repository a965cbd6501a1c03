use crate::args::ExportArgs;
use crate::commands::Out;
use crate::engine;
use crate::error::{ErrorType, IntoResult};
use crate::present;
use crate::tracker::Tracker;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDate;

/// Writes the transactions of the selected period as CSV, newest first. The CSV goes to the
/// output file when one is given, and to stdout otherwise. Returns the number of rows written.
pub async fn export(config: Config, args: &ExportArgs, now: NaiveDate) -> Result<Out<usize>> {
    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;
    let transactions = tracker.transactions();
    let selected = engine::sorted_by_date_desc(engine::filter_by_period(
        &transactions,
        &args.selection(),
        now,
    ));

    let mut buf = Vec::new();
    present::write_csv(&mut buf, selected.iter().copied())?;
    let count = selected.len();

    match args.output() {
        Some(path) => {
            utils::write(path, &buf)
                .await
                .pub_result(ErrorType::Storage)?;
            Ok(Out::new(
                format!("Exported {count} transactions to {}", path.display()),
                count,
            ))
        }
        None => {
            let csv = String::from_utf8(buf).context("CSV output is not valid UTF-8")?;
            Ok(Out::new(format!("Exported {count} transactions"), count).with_text(csv))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::PeriodArgs;
    use crate::model::Period;
    use crate::test::{ymd, TestEnv};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_export_to_file() {
        let env = TestEnv::new().await;
        env.seed().await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("may.csv");
        let args = ExportArgs::new(PeriodArgs::new(Period::Month, None), Some(path.clone()));
        let out = export(env.config(), &args, ymd(2024, 5, 31)).await.unwrap();
        assert_eq!(out.structure(), Some(&3));
        assert!(out.text().is_none());

        let csv = utils::read(&path).await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id,date,text,category,amount");
        assert!(lines[1].starts_with("t-gift,2024-05-06,Birthday gift,other,"));
    }

    #[tokio::test]
    async fn test_export_to_stdout_includes_invalid_dates() {
        let env = TestEnv::new().await;
        env.seed().await;
        let args = ExportArgs::new(PeriodArgs::default(), None);
        let out = export(env.config(), &args, ymd(2024, 5, 31)).await.unwrap();
        assert_eq!(out.structure(), Some(&6));
        let text = out.text().unwrap();
        assert!(text.lines().last().unwrap().starts_with("t-bad,unknown date,"));
    }
}
