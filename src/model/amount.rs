//! Amount type for handling signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Negative amounts are expenses and
//! positive amounts are income. Amounts are written to JSON as plain numbers, but they can be read
//! from numbers or from strings that carry a currency symbol and thousands separators.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Neg};
use std::str::FromStr;

/// Currency symbols that are tolerated, and ignored, when parsing a string.
const CURRENCY_SYMBOLS: &[char] = &['$', '฿', '€', '£'];

/// Represents a signed amount of money.
///
/// # Examples
///
/// ```
/// # use money_tracker::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-฿1,250.50").unwrap();
/// let b = Amount::from_str("-1250.5").unwrap();
/// assert_eq!(a, b);
/// assert!(a.is_expense());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Income is any strictly positive amount.
    pub fn is_income(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// An expense is any strictly negative amount.
    pub fn is_expense(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Amount {
        Amount(self.0.abs())
    }

    /// Rounds to 2 decimal places, with midpoints rounded away from zero.
    pub fn round2(&self) -> Amount {
        Amount(round2(self.0))
    }

    /// Whether the amount survives being written as a JSON number and read back unchanged.
    pub fn fits_json_number(&self) -> bool {
        nearest_f64(self.0).and_then(shortest_decimal) == Some(self.0)
    }
}

/// The `f64` closest to `value`.
fn nearest_f64(value: Decimal) -> Option<f64> {
    value.to_string().parse().ok()
}

/// The shortest decimal that reads back as `f`.
fn shortest_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_str(&f.to_string()).ok()
}

/// Rounds `value` to 2 decimal places, with midpoints rounded away from zero.
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub enum AmountError {
    /// The text is not a number.
    Parse(rust_decimal::Error),
    /// The value has more significant digits than a JSON number keeps.
    Precision(Decimal),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Parse(e) => Display::fmt(e, f),
            AmountError::Precision(value) => write!(
                f,
                "{value} has more significant digits than can be stored"
            ),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            AmountError::Precision(_) => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = rest
            .trim_start_matches(CURRENCY_SYMBOLS)
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let value = Decimal::from_str(&digits).map_err(AmountError::Parse)?;
        let amount = Amount(if negative { -value } else { value });
        if !amount.fits_json_number() {
            return Err(AmountError::Precision(amount.0));
        }
        Ok(amount)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

/// Written as a JSON number. An amount that a number cannot hold exactly is an error rather than
/// a silently different value.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match nearest_f64(self.0) {
            Some(f) if self.fits_json_number() => serializer.serialize_f64(f),
            _ => Err(serde::ser::Error::custom(AmountError::Precision(self.0))),
        }
    }
}

/// What we accept for an amount in stored records: a JSON number, or a string holding one.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(f) => shortest_decimal(f)
                .map(Amount)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount {f}"))),
            RawAmount::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}
