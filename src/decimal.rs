//! Exact decimal amounts.
//!
//! Wraps `rust_decimal::Decimal` without touching the scale, so an amount
//! read as `100.50` is reported back as `100.50`. Amounts cross the JSON
//! boundary as numbers carrying their exact decimal text.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary amount kept at whatever precision it was given.
///
/// Equality and hashing compare numeric value, so `100` and `100.00`
/// are the same amount when grouping.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use payments_report::Amount;
///
/// let amount = Amount::from_str("10.50").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// assert!(amount.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places of a reported average.
    pub const AVERAGE_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Converts a JSON number into an amount using its literal text.
    ///
    /// Exponent notation is accepted. Returns `None` when the value does not
    /// fit in a `Decimal`.
    pub fn from_json_number(number: &serde_json::Number) -> Option<Self> {
        let text = number.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
            .map(Amount)
    }

    /// Arithmetic mean rounded half-to-even to two decimal places.
    ///
    /// The result always carries exactly two decimal places; an empty slice
    /// yields `0.00`.
    pub fn mean(amounts: &[Amount]) -> Amount {
        let mean = if amounts.is_empty() {
            Decimal::ZERO
        } else {
            let count = Decimal::from(amounts.len());
            match amounts
                .iter()
                .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount.0))
            {
                Some(sum) => sum / count,
                // Sum overflowed; fall back to a running mean.
                None => running_mean(amounts),
            }
        };

        let mut rounded =
            mean.round_dp_with_strategy(Self::AVERAGE_SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::AVERAGE_SCALE);
        Amount(rounded)
    }
}

/// Incremental mean, `m += (x - m) / k`, which stays within the range of
/// its inputs.
fn running_mean(amounts: &[Amount]) -> Decimal {
    amounts
        .iter()
        .enumerate()
        .fold(Decimal::ZERO, |mean, (index, amount)| {
            mean + (amount.0 - mean) / Decimal::from(index + 1)
        })
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number =
            serde_json::Number::from_str(&self.0.to_string()).map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn amounts(values: &[&str]) -> Vec<Amount> {
        values.iter().map(|v| amount(v)).collect()
    }

    #[test]
    fn test_from_str_preserves_scale() {
        assert_eq!(amount("100").to_string(), "100");
        assert_eq!(amount("100.00").to_string(), "100.00");
        assert_eq!(amount("  2.5  ").to_string(), "2.5");
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(amount("100"), amount("100.00"));
    }

    #[test]
    fn test_is_positive() {
        assert!(amount("0.01").is_positive());
        assert!(!amount("0").is_positive());
        assert!(!amount("-5").is_positive());
    }

    #[test]
    fn test_from_json_number() {
        let number = serde_json::Number::from_str("123.4500").unwrap();
        assert_eq!(Amount::from_json_number(&number).unwrap().to_string(), "123.4500");

        let number = serde_json::Number::from_str("1.5e2").unwrap();
        assert_eq!(Amount::from_json_number(&number).unwrap(), amount("150"));

        let number = serde_json::Number::from_str("1e40").unwrap();
        assert!(Amount::from_json_number(&number).is_none());
    }

    #[test]
    fn test_mean_of_whole_numbers_has_two_places() {
        assert_eq!(Amount::mean(&amounts(&["10", "20", "30"])).to_string(), "20.00");
    }

    #[test]
    fn test_mean_rounds_half_to_even() {
        // 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(Amount::mean(&amounts(&["0.12", "0.13"])).to_string(), "0.12");
        assert_eq!(Amount::mean(&amounts(&["0.13", "0.14"])).to_string(), "0.14");
    }

    #[test]
    fn test_mean_of_non_terminating_ratio() {
        assert_eq!(Amount::mean(&amounts(&["10", "10", "20"])).to_string(), "13.33");
        assert_eq!(Amount::mean(&amounts(&["10", "20", "20"])).to_string(), "16.67");
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(Amount::mean(&[]).to_string(), "0.00");
    }

    #[test]
    fn test_mean_survives_sum_overflow() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(Amount::mean(&[max, max]).value(), Decimal::MAX);
    }

    #[test]
    fn test_serializes_as_exact_json_number() {
        let json = serde_json::to_string(&amount("100.10")).unwrap();
        assert_eq!(json, "100.10");
    }
}
