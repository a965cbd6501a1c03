use crate::args::ReportArgs;
use crate::commands::Out;
use crate::engine::{self, Report};
use crate::error::{ErrorType, IntoResult};
use crate::model::{ReportPeriod, ReportSelection};
use crate::present;
use crate::present::ChartSlice;
use crate::tracker::Tracker;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// The category report together with what is needed to draw it as a chart.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    #[serde(flatten)]
    pub report: Report,
    pub slices: Vec<ChartSlice>,
}

/// Totals per category for the selected month or week, plus the largest category.
pub async fn report(
    config: Config,
    args: &ReportArgs,
    now: NaiveDate,
) -> Result<Out<ReportOutput>> {
    let store = config.open_store().await.pub_result(ErrorType::Storage)?;
    let tracker = Tracker::open(store).await?;
    let selection = args.selection();
    let report = engine::report(&tracker.transactions(), &selection, now);
    let text = render(&report, &selection, config.currency());
    let message = match &report.insight {
        Some(insight) => present::insight_message(insight, report.kind, config.currency()),
        None => present::empty_report_message(report.kind).to_string(),
    };
    let slices = present::chart_slices(&report);
    Ok(Out::new(message, ReportOutput { report, slices }).with_text(text))
}

fn render(report: &Report, selection: &ReportSelection, symbol: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} by category, {}", report.kind, window(&selection.period));
    if report.totals.is_empty() {
        let _ = writeln!(text, "{}", present::empty_report_message(report.kind));
        return text;
    }
    for (category, total) in report.totals.iter() {
        let style = present::category_style(category);
        let _ = writeln!(
            text,
            "{} {:<13} {:>16}",
            style.icon,
            style.label,
            present::money(total, symbol)
        );
    }
    let _ = writeln!(
        text,
        "  {:<13} {:>16}",
        "Total",
        present::money(report.totals.grand_total(), symbol)
    );
    if let Some(insight) = &report.insight {
        let _ = writeln!(
            text,
            "\n{}",
            present::insight_message(insight, report.kind, symbol)
        );
    }
    text
}

fn window(period: &ReportPeriod) -> String {
    match period {
        ReportPeriod::Month(Some(month)) => month.to_string(),
        ReportPeriod::Month(None) => "this month".to_string(),
        ReportPeriod::Week(Some(week)) => week.to_string(),
        ReportPeriod::Week(None) => "this week".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ReportMode, WeekKey, YearMonth};
    use crate::test::{ymd, TestEnv};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_report_current_month_expenses() {
        for env in TestEnv::all().await {
            env.seed().await;
            let out = report(env.config(), &ReportArgs::default(), ymd(2024, 5, 20))
                .await
                .unwrap();
            let r = &out.structure().unwrap().report;
            let order: Vec<Category> = r.totals.categories().collect();
            assert_eq!(order, vec![Category::Food, Category::Transport]);
            assert_eq!(r.totals.get(Category::Food), Some(Decimal::from(300)));
            let insight = r.insight.unwrap();
            assert_eq!(insight.category, Category::Food);
            assert_eq!(insight.percent, 75);
            assert!(out.message().contains("Food"));
            assert!(out.text().unwrap().contains("฿400.00"));

            let slices = &out.structure().unwrap().slices;
            assert_eq!(slices.len(), 2);
            assert_eq!(slices[0].icon, "🍔");
            assert_eq!(slices[1].slice_color, present::EXPENSE_PALETTE[1]);
        }
    }

    #[tokio::test]
    async fn test_report_income_for_month() {
        let env = TestEnv::new().await;
        env.seed().await;
        let april = YearMonth::new(2024, 4).unwrap();
        let args = ReportArgs::new(ReportMode::Month, Some(april), None, true);
        let out = report(env.config(), &args, ymd(2024, 5, 20)).await.unwrap();
        let r = &out.structure().unwrap().report;
        assert_eq!(r.totals.len(), 1);
        assert_eq!(r.insight.unwrap().category, Category::Salary);
        assert_eq!(r.insight.unwrap().percent, 100);
        assert!(out.message().starts_with("Most of your income"));
    }

    #[tokio::test]
    async fn test_report_week() {
        let env = TestEnv::new().await;
        env.seed().await;
        let week = WeekKey::new(2024, 19).unwrap();
        let args = ReportArgs::new(ReportMode::Week, None, Some(week), true);
        let out = report(env.config(), &args, ymd(2025, 1, 1)).await.unwrap();
        let r = &out.structure().unwrap().report;
        assert_eq!(r.totals.get(Category::Other), Some(Decimal::from(500)));
        assert!(out
            .text()
            .unwrap()
            .starts_with("income by category, 2024-W19"));
    }

    #[tokio::test]
    async fn test_report_json_has_totals_and_slices() {
        let env = TestEnv::new().await;
        env.seed().await;
        let out = report(env.config(), &ReportArgs::default(), ymd(2024, 5, 20))
            .await
            .unwrap();
        let json = serde_json::to_value(out.structure().unwrap()).unwrap();
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["insight"]["category"], "food");
        assert_eq!(json["slices"][0]["badge_color"], "#f59e0b");
        assert_eq!(json["slices"][1]["category"], "transport");
    }

    #[tokio::test]
    async fn test_report_empty() {
        let env = TestEnv::new().await;
        env.seed().await;
        let out = report(env.config(), &ReportArgs::default(), ymd(2023, 1, 1))
            .await
            .unwrap();
        let output = out.structure().unwrap();
        assert!(output.report.totals.is_empty());
        assert!(output.report.insight.is_none());
        assert!(output.slices.is_empty());
        assert_eq!(out.message(), "No expenses in this period");
    }
}
