use crate::engine::week::iso_week;
use crate::model::{
    FilterSelection, ReportKind, ReportPeriod, ReportSelection, Transaction, WeekKey, YearMonth,
};
use chrono::NaiveDate;
use tracing::trace;

/// A concrete time window that a transaction's date either falls in or does not.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Window {
    Month(YearMonth),
    Week(WeekKey),
}

impl Window {
    fn contains(&self, transaction: &Transaction) -> bool {
        // An invalid date is in no month and no week.
        let Some(date) = transaction.date().date() else {
            return false;
        };
        match self {
            Window::Month(ym) => ym.contains(date),
            // A date whose week cannot be computed is in no week.
            Window::Week(week) => iso_week(date) == Some(*week),
        }
    }
}

/// Selects the transactions shown by the balance view.
///
/// - `All` keeps everything, including transactions with invalid dates.
/// - `Month(Some(m))` keeps the transactions dated in `m`; `Month(None)` uses the month of `now`.
/// - `Week` keeps the transactions in the ISO week of `now`.
///
/// The input is not modified and the relative order of the kept transactions is preserved.
pub fn filter_by_period<'a, I>(
    transactions: I,
    selection: &FilterSelection,
    now: NaiveDate,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let window = match selection {
        FilterSelection::All => return transactions.into_iter().collect(),
        FilterSelection::Month(month) => Window::Month(month.unwrap_or_else(|| YearMonth::of(now))),
        FilterSelection::Week => match iso_week(now) {
            Some(week) => Window::Week(week),
            None => return Vec::new(),
        },
    };
    trace!("filter_by_period: {window:?}");
    transactions
        .into_iter()
        .filter(|t| window.contains(t))
        .collect()
}

/// Selects the transactions that feed the category report.
///
/// The window works like `filter_by_period`, except that weeks can be picked explicitly. Then only
/// expenses (`amount < 0`) or only income (`amount > 0`) are kept, according to the report kind.
pub fn filter_by_report<'a, I>(
    transactions: I,
    selection: &ReportSelection,
    now: NaiveDate,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let window = match selection.period {
        ReportPeriod::Month(month) => Window::Month(month.unwrap_or_else(|| YearMonth::of(now))),
        ReportPeriod::Week(week) => match week.or_else(|| iso_week(now)) {
            Some(week) => Window::Week(week),
            None => return Vec::new(),
        },
    };
    trace!("filter_by_report: {window:?}, {}", selection.kind);
    transactions
        .into_iter()
        .filter(|t| window.contains(t))
        .filter(|t| match selection.kind {
            ReportKind::Expense => t.is_expense(),
            ReportKind::Income => t.is_income(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ReportMode, TxDate};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(id: &str, amount: i32, date: impl Into<TxDate>) -> Transaction {
        Transaction::new(id, id, amount, date, Category::Other)
    }

    fn ids(list: &[&Transaction]) -> Vec<String> {
        list.iter().map(|t| t.id().to_string()).collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("jan-1", -100, ymd(2024, 1, 1)),
            tx("jan-7", 300, ymd(2024, 1, 7)),
            tx("jan-8", -20, ymd(2024, 1, 8)),
            tx("dec-31", -40, ymd(2023, 12, 31)),
            tx("feb-14", -75, ymd(2024, 2, 14)),
            tx("broken", -5, TxDate::parse("not a date")),
        ]
    }

    #[test]
    fn test_all_returns_everything() {
        let list = sample();
        let now = ymd(2024, 1, 3);
        let got = filter_by_period(&list, &FilterSelection::All, now);
        assert_eq!(got.len(), list.len());
        for (a, b) in got.iter().zip(list.iter()) {
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn test_month_defaults_to_now() {
        let list = sample();
        let got = filter_by_period(&list, &FilterSelection::Month(None), ymd(2024, 1, 20));
        assert_eq!(ids(&got), vec!["jan-1", "jan-7", "jan-8"]);
    }

    #[test]
    fn test_explicit_month() {
        let list = sample();
        let feb = YearMonth::new(2024, 2).unwrap();
        let got = filter_by_period(&list, &FilterSelection::Month(Some(feb)), ymd(2024, 1, 20));
        assert_eq!(ids(&got), vec!["feb-14"]);
    }

    #[test]
    fn test_transaction_dated_now_is_in_default_month_only() {
        let now = ymd(2024, 6, 15);
        let list = vec![tx("today", -1, now)];
        assert_eq!(
            filter_by_period(&list, &FilterSelection::Month(None), now).len(),
            1
        );
        let other = YearMonth::new(2024, 7).unwrap();
        assert!(filter_by_period(&list, &FilterSelection::Month(Some(other)), now).is_empty());
        let same_month_last_year = YearMonth::new(2023, 6).unwrap();
        assert!(
            filter_by_period(&list, &FilterSelection::Month(Some(same_month_last_year)), now)
                .is_empty()
        );
    }

    #[test]
    fn test_week_uses_iso_week_of_now() {
        let list = sample();
        // Wednesday of ISO week 1 of 2024.
        let got = filter_by_period(&list, &FilterSelection::Week, ymd(2024, 1, 3));
        assert_eq!(ids(&got), vec!["jan-1", "jan-7"]);
        // Dec 31, 2023 is in week 52 of 2023, together with Dec 25.
        let got = filter_by_period(&list, &FilterSelection::Week, ymd(2023, 12, 25));
        assert_eq!(ids(&got), vec!["dec-31"]);
    }

    #[test]
    fn test_invalid_dates_excluded_from_windows() {
        let list = vec![tx("broken", -5, TxDate::parse("31/31/2024"))];
        let now = ymd(2024, 1, 1);
        assert!(filter_by_period(&list, &FilterSelection::Month(None), now).is_empty());
        assert!(filter_by_period(&list, &FilterSelection::Week, now).is_empty());
        assert_eq!(filter_by_period(&list, &FilterSelection::All, now).len(), 1);
    }

    #[test]
    fn test_week_views_skip_dates_at_the_end_of_the_calendar() {
        let json = r#"[
            {"id": "far", "text": "x", "amount": -1, "date": "+262142-12-31"},
            {"id": "jan-2", "text": "y", "amount": -2, "date": "2024-01-02"}
        ]"#;
        let list: crate::model::Transactions = serde_json::from_str(json).unwrap();
        assert!(list.iter().all(|t| t.date().is_valid()));
        let now = ymd(2024, 1, 1);

        let got = filter_by_period(&list, &FilterSelection::Week, now);
        assert_eq!(ids(&got), vec!["jan-2"]);

        let sel = ReportSelection::new(ReportMode::Week, None, None, ReportKind::Expense);
        assert_eq!(ids(&filter_by_report(&list, &sel, now)), vec!["jan-2"]);

        // "now" itself without a week selects nothing.
        let last = NaiveDate::from_ymd_opt(262142, 12, 31).unwrap();
        assert!(filter_by_period(&list, &FilterSelection::Week, last).is_empty());
    }

    #[test]
    fn test_report_month_and_kind() {
        let list = sample();
        let now = ymd(2024, 1, 20);
        let expenses = ReportSelection::default();
        assert_eq!(
            ids(&filter_by_report(&list, &expenses, now)),
            vec!["jan-1", "jan-8"]
        );
        let income = ReportSelection {
            kind: ReportKind::Income,
            ..expenses
        };
        assert_eq!(ids(&filter_by_report(&list, &income, now)), vec!["jan-7"]);
    }

    #[test]
    fn test_report_explicit_week() {
        let list = sample();
        let week = WeekKey::new(2024, 2).unwrap();
        let sel = ReportSelection::new(ReportMode::Week, None, Some(week), ReportKind::Expense);
        let got = filter_by_report(&list, &sel, ymd(2024, 6, 1));
        assert_eq!(ids(&got), vec!["jan-8"]);
    }

    #[test]
    fn test_report_week_defaults_to_now() {
        let list = sample();
        let sel = ReportSelection::new(ReportMode::Week, None, None, ReportKind::Expense);
        let got = filter_by_report(&list, &sel, ymd(2024, 1, 5));
        assert_eq!(ids(&got), vec!["jan-1"]);
    }

    #[test]
    fn test_report_ignores_balance_selection_month() {
        // The report only reads its own month picker.
        let list = sample();
        let feb = YearMonth::new(2024, 2).unwrap();
        let sel = ReportSelection::new(ReportMode::Month, Some(feb), None, ReportKind::Expense);
        let got = filter_by_report(&list, &sel, ymd(2024, 1, 20));
        assert_eq!(ids(&got), vec!["feb-14"]);
    }
}
