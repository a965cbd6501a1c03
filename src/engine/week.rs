use crate::model::WeekKey;
use chrono::{Datelike, Duration, NaiveDate};

/// Computes the ISO-8601 week of `date`.
///
/// The date is moved to the Thursday of its (Monday-based) week. That Thursday's year is the week's
/// year, and the number of weeks between January 1st of that year and the Thursday, plus one, is
/// the week number.
///
/// Returns `None` when that Thursday is outside the range of `NaiveDate`, which only happens for
/// the first and last few days chrono can represent.
pub fn iso_week(date: NaiveDate) -> Option<WeekKey> {
    let weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date.checked_add_signed(Duration::days(4 - weekday))?;
    let week = thursday.ordinal0() / 7 + 1;
    Some(WeekKey::new_unchecked(thursday.year(), week))
}
