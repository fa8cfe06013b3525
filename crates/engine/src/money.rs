use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, balances, summaries) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = income
/// - negative = expense
/// - zero = neither
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude a stored amount may have (`99999999.99`).
    pub const MAX_ABS: i64 = 99_999_999_99;

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is income.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is an expense.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Value as a float, for spreadsheet cells only.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Rejects amounts outside `-MAX_ABS..=MAX_ABS`, naming `field`.
    pub fn bounded(self, field: &str) -> ResultEngine<Money> {
        if self.0.unsigned_abs() > Self::MAX_ABS.unsigned_abs() {
            return Err(EngineError::validation(
                field,
                format!("must be between -{0} and {0}", Money(Self::MAX_ABS)),
            ));
        }
        Ok(self)
    }

    /// Parses `raw` and labels any error with `field`.
    pub fn parse_field(raw: &str, field: &str) -> ResultEngine<Money> {
        raw.parse::<Money>().map_err(|err| match err {
            EngineError::Validation { message, .. } => EngineError::validation(field, message),
            other => other,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - magnitude at most [`Money::MAX_ABS`]
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::validation("amount", "empty amount");
        let invalid = || EngineError::validation("amount", format!("'{s}' is not a number"));
        let overflow = || EngineError::validation("amount", "amount too large");

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::validation(
                            "amount",
                            "at most 2 decimal places",
                        ));
                    }
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Money(if negative { -total } else { total }).bounded("amount")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_amounts_past_the_storable_range() {
        assert_eq!(
            "99999999.99".parse::<Money>().unwrap().cents(),
            Money::MAX_ABS
        );
        assert_eq!(
            "-99999999.99".parse::<Money>().unwrap().cents(),
            -Money::MAX_ABS
        );
        let err = "100000000".parse::<Money>().unwrap_err();
        assert_eq!(err.field(), Some("amount"));
        assert!("-100000000.00".parse::<Money>().is_err());
        assert!("92233720368547758.07".parse::<Money>().is_err());
    }

    #[test]
    fn bounded_names_the_field() {
        assert!(Money::new(Money::MAX_ABS).bounded("amount").is_ok());
        let err = Money::new(i64::MIN).bounded("amount").unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn arithmetic_saturates_instead_of_overflowing() {
        assert_eq!(Money::new(i64::MAX) + Money::new(1), Money::new(i64::MAX));
        assert_eq!(-Money::new(i64::MIN), Money::new(i64::MAX));
        let mut total = Money::new(i64::MIN);
        total += Money::new(-1);
        assert_eq!(total, Money::new(i64::MIN));
    }

    #[test]
    fn parse_field_relabels_error() {
        let err = Money::parse_field("abc", "min_amount").unwrap_err();
        assert_eq!(err.field(), Some("min_amount"));
    }

    #[test]
    fn sums_signed_amounts() {
        let total: Money = [Money::new(10_000), Money::new(-3_000), Money::ZERO]
            .iter()
            .sum();
        assert_eq!(total, Money::new(7_000));
        assert_eq!(total.as_f64(), 70.0);
    }
}
