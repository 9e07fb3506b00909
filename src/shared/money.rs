//! Currency amounts stored as integer minor units (cents).

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An amount of money in the hotel's single currency, in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `Money::from_major(150)` is 150.00.
    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by a whole count (nights, rooms). `None` on overflow.
    pub fn times(self, count: i64) -> Option<Money> {
        self.0.checked_mul(count).map(Money)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts "150", "150.5", "150.50" and rounds half away from zero to cents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value =
            Decimal::from_str(trimmed).map_err(|_| ParseMoneyError::Invalid(trimmed.to_string()))?;
        let cents = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or_else(|| ParseMoneyError::OutOfRange(trimmed.to_string()))?;
        Ok(Money(cents))
    }
}

/// Saturates at the `i64` cent bounds instead of overflowing.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.fold(0i64, |acc, m| acc.saturating_add(m.0)))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("150".parse::<Money>().unwrap(), Money::from_major(150));
        assert_eq!("150.5".parse::<Money>().unwrap(), Money::from_cents(15_050));
        assert_eq!(" 99.99 ".parse::<Money>().unwrap(), Money::from_cents(9_999));
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!("10.005".parse::<Money>().unwrap(), Money::from_cents(1_001));
        assert_eq!("10.004".parse::<Money>().unwrap(), Money::from_cents(1_000));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "abc".parse::<Money>(),
            Err(ParseMoneyError::Invalid(_))
        ));
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_major(150).to_string(), "150.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1_250).to_string(), "-12.50");
    }

    #[test]
    fn sum_and_multiply() {
        let total: Money = [Money::from_major(75), Money::from_cents(50)].iter().sum();
        assert_eq!(total, Money::from_cents(7_550));
        assert_eq!(Money::from_major(75).times(2), Some(Money::from_major(150)));
        assert_eq!(Money::from_cents(i64::MAX).times(2), None);
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let huge = [Money::from_cents(i64::MAX), Money::from_cents(1)];
        assert_eq!(huge.iter().sum::<Money>(), Money::from_cents(i64::MAX));
        let owed = [Money::from_cents(i64::MIN), Money::from_cents(-1)];
        assert_eq!(owed.into_iter().sum::<Money>(), Money::from_cents(i64::MIN));
    }
}
