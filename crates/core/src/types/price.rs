//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed {max}", max = Price::MAX)]
    TooLarge,
}

/// A unit price in the store currency's standard unit (dollars, not cents).
///
/// Serializes as a decimal string (`"49.99"`); deserializes from either a
/// string or a JSON number so carts saved with float prices still load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price accepted from user input ($1,000,000,000.00).
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount. Negative amounts are allowed
    /// here; the cart store decides whether to accept them.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a non-negative price from user input (e.g. `"49.99"`).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the input is not a decimal number,
    /// [`PriceError::Negative`] if it is below zero and
    /// [`PriceError::TooLarge`] if it is above [`Price::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        let price = Self(amount);
        if price.is_negative() {
            return Err(PriceError::Negative);
        }
        if price.is_too_large() {
            return Err(PriceError::TooLarge);
        }
        Ok(price)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Whether the amount is above [`Price::MAX`].
    #[must_use]
    pub fn is_too_large(&self) -> bool {
        self.0 > Self::MAX.0
    }

    /// Price multiplied by a quantity, saturating at the bounds of `Decimal`.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Decimal {
        let quantity = Decimal::from(quantity);
        self.0
            .checked_mul(quantity)
            .unwrap_or_else(|| saturated(self.0.is_sign_negative() != quantity.is_sign_negative()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Sum of amounts, saturating at the bounds of `Decimal` instead of
/// overflowing.
#[must_use]
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .unwrap_or_else(|| saturated(amount.is_sign_negative()))
    })
}

const fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Format an amount for display: `$` prefix, two decimal places (midpoint
/// rounded away from zero) and comma thousands separators.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::format_money;
///
/// assert_eq!(format_money(Decimal::new(123450, 2)), "$1,234.50");
/// assert_eq!(format_money(Decimal::ZERO), "$0.00");
/// ```
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_grouping() {
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
        assert_eq!(format_money(Decimal::new(4999, 2)), "$49.99");
        assert_eq!(format_money(Decimal::new(999, 0)), "$999.00");
        assert_eq!(format_money(Decimal::new(1000, 0)), "$1,000.00");
        assert_eq!(format_money(Decimal::new(12345, 1)), "$1,234.50");
        assert_eq!(format_money(Decimal::new(1_234_567_891, 3)), "$1,234,567.89");
    }

    #[test]
    fn test_format_money_rounds_half_up() {
        assert_eq!(format_money(Decimal::new(1005, 3)), "$1.01");
        assert_eq!(format_money(Decimal::new(1004, 3)), "$1.00");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(Decimal::new(-150_000, 2)), "-$1,500.00");
        assert_eq!(format_money(Decimal::new(-1, 3)), "$0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Price::parse("49.99").unwrap(), Price::from_cents(4999));
        assert_eq!(Price::parse(" 0 ").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_parse_upper_bound() {
        assert_eq!(Price::parse("1000000000").unwrap(), Price::MAX);
        assert_eq!(Price::parse("1000000000.01"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
        assert_eq!(
            PriceError::TooLarge.to_string(),
            "price cannot exceed $1,000,000,000.00"
        );
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::from_cents(4999).times(3), Decimal::new(14997, 2));
        assert_eq!(Price::from_cents(4999).times(0), Decimal::ZERO);
        assert_eq!(Price::from_cents(4999).times(-2), Decimal::new(-9998, 2));
    }

    #[test]
    fn test_times_saturates() {
        assert_eq!(Price::new(Decimal::MAX).times(2), Decimal::MAX);
        assert_eq!(Price::new(Decimal::MAX).times(-2), Decimal::MIN);
        assert_eq!(Price::MAX.times(i64::MAX), Price::MAX.amount() * Decimal::from(i64::MAX));
    }

    #[test]
    fn test_sum_amounts_saturates() {
        assert_eq!(
            sum_amounts([Decimal::new(150, 2), Decimal::new(250, 2)]),
            Decimal::new(4, 0)
        );
        assert_eq!(sum_amounts([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(sum_amounts([Decimal::MIN, Decimal::NEGATIVE_ONE]), Decimal::MIN);
        assert_eq!(sum_amounts(std::iter::empty()), Decimal::ZERO);
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"49.99\"").unwrap();
        let from_num: Price = serde_json::from_str("49.99").unwrap();
        assert_eq!(from_str, Price::from_cents(4999));
        assert_eq!(from_num, Price::from_cents(4999));
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"49.99\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(149_997).to_string(), "$1,499.97");
    }
}
