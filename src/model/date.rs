use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The calendar date of a transaction.
///
/// Dates come from stored records that we do not control, so a date that cannot be parsed is kept
/// (verbatim) as `TxDate::Invalid` rather than failing the whole list. An invalid date never falls
/// inside a month or a week.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TxDate {
    Valid(NaiveDate),
    Invalid(String),
}

impl TxDate {
    /// Parses `YYYY-MM-DD`, an RFC 3339 timestamp, or `YYYY-MM-DDTHH:MM:SS`. Only the calendar
    /// date is kept.
    pub fn parse(s: &str) -> TxDate {
        let trimmed = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return TxDate::Valid(d);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return TxDate::Valid(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return TxDate::Valid(dt.date());
        }
        TxDate::Invalid(s.to_string())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TxDate::Valid(d) => Some(*d),
            TxDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TxDate::Valid(_))
    }

    /// Ordering used by the list view: newest first, with invalid dates after every valid one.
    pub fn cmp_newest_first(&self, other: &TxDate) -> Ordering {
        match (self.date(), other.date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<NaiveDate> for TxDate {
    fn from(value: NaiveDate) -> Self {
        TxDate::Valid(value)
    }
}

impl FromStr for TxDate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TxDate::parse(s))
    }
}

impl Display for TxDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TxDate::Valid(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            TxDate::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for TxDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TxDate::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(TxDate::parse("2024-03-09"), TxDate::Valid(ymd(2024, 3, 9)));
        assert_eq!(
            TxDate::parse("2024-03-09T23:15:00+07:00"),
            TxDate::Valid(ymd(2024, 3, 9))
        );
        assert_eq!(
            TxDate::parse("2024-03-09T08:00:00"),
            TxDate::Valid(ymd(2024, 3, 9))
        );
    }

    #[test]
    fn test_parse_invalid_is_kept() {
        let d = TxDate::parse("next tuesday");
        assert_eq!(d, TxDate::Invalid("next tuesday".into()));
        assert!(!d.is_valid());
        assert_eq!(d.to_string(), "next tuesday");
        assert_eq!(TxDate::parse("2024-02-30").date(), None);
    }

    #[test]
    fn test_serde() {
        let d: TxDate = serde_json::from_str("\"2023-12-31\"").unwrap();
        assert_eq!(d.date(), Some(ymd(2023, 12, 31)));
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2023-12-31\"");
        let bad: TxDate = serde_json::from_str("\"??\"").unwrap();
        assert_eq!(serde_json::to_string(&bad).unwrap(), "\"??\"");
    }

    #[test]
    fn test_newest_first() {
        let mut dates = vec![
            TxDate::parse("bogus"),
            TxDate::from(ymd(2024, 1, 1)),
            TxDate::from(ymd(2024, 6, 1)),
        ];
        dates.sort_by(|a, b| a.cmp_newest_first(b));
        assert_eq!(dates[0].date(), Some(ymd(2024, 6, 1)));
        assert_eq!(dates[1].date(), Some(ymd(2024, 1, 1)));
        assert!(!dates[2].is_valid());
    }
}
