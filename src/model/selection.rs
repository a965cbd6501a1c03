//! The user's view selections: which period the balance view covers and which period and kind of
//! transaction the category report covers. The two are independent of each other.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month, as picked with a `YYYY-MM` month picker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> crate::Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12, got {month}");
        }
        Ok(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("Expected a month like 2024-03, got '{s}'"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month in '{s}'"))?;
        YearMonth::new(year, month)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An ISO-8601 week, as picked with a `YYYY-Www` week picker. `year` is the ISO week-year, which
/// differs from the calendar year for a few days around New Year.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> crate::Result<Self> {
        if !(1..=53).contains(&week) {
            bail!("Week must be between 1 and 53, got {week}");
        }
        Ok(Self { year, week })
    }

    /// Only for values that are already known to be in range.
    pub(crate) const fn new_unchecked(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl FromStr for WeekKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let (year, week) = upper
            .split_once("-W")
            .with_context(|| format!("Expected a week like 2024-W05, got '{s}'"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in '{s}'"))?;
        let week: u32 = week
            .parse()
            .with_context(|| format!("Invalid week number in '{s}'"))?;
        WeekKey::new(year, week)
    }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

macro_rules! string_serde {
    ($t:ty) => {
        impl Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(YearMonth);
string_serde!(WeekKey);

/// The period names offered by the balance view's period filter.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
}

serde_plain::derive_display_from_serialize!(Period);
serde_plain::derive_fromstr_from_deserialize!(Period);

/// The balance view's period filter.
///
/// `Week` always means the week containing "now". There is no explicit week for this view; only
/// the report has a week picker.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "period", content = "month")]
pub enum FilterSelection {
    #[default]
    All,
    Week,
    /// `None` means the month containing "now".
    Month(Option<YearMonth>),
}

impl FilterSelection {
    /// Builds the selection from the period filter and the month picker. The month picker is only
    /// read when the period is `Month`.
    pub fn new(period: Period, month: Option<YearMonth>) -> Self {
        match period {
            Period::All => FilterSelection::All,
            Period::Week => FilterSelection::Week,
            Period::Month => FilterSelection::Month(month),
        }
    }

    pub fn period(&self) -> Period {
        match self {
            FilterSelection::All => Period::All,
            FilterSelection::Week => Period::Week,
            FilterSelection::Month(_) => Period::Month,
        }
    }
}

/// Whether the report shows where money went or where it came from.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(ReportKind);
serde_plain::derive_fromstr_from_deserialize!(ReportKind);

/// The period names offered by the report's period mode selector.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    #[default]
    Month,
    Week,
}

serde_plain::derive_display_from_serialize!(ReportMode);
serde_plain::derive_fromstr_from_deserialize!(ReportMode);

/// The report's time window. `None` means the month or week containing "now".
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum ReportPeriod {
    Month(Option<YearMonth>),
    Week(Option<WeekKey>),
}

impl Default for ReportPeriod {
    fn default() -> Self {
        ReportPeriod::Month(None)
    }
}

/// The chart view's selection. Independent of `FilterSelection`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReportSelection {
    pub period: ReportPeriod,
    pub kind: ReportKind,
}

impl ReportSelection {
    /// Builds the selection from the mode selector and both pickers. Only the picker belonging to
    /// `mode` is read.
    pub fn new(
        mode: ReportMode,
        month: Option<YearMonth>,
        week: Option<WeekKey>,
        kind: ReportKind,
    ) -> Self {
        let period = match mode {
            ReportMode::Month => ReportPeriod::Month(month),
            ReportMode::Week => ReportPeriod::Week(week),
        };
        Self { period, kind }
    }
}
