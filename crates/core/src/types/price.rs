//! Rupee prices using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Indian rupees.
///
/// The backend sends prices as plain JSON numbers. Arithmetic stays in
/// `Decimal` so cart totals never pick up floating point noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at the decimal range instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

/// Renders as `Rs. 100` or `Rs. 12.5` (trailing zeros trimmed).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs. {}", self.0.normalize())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!(Price::new(Decimal::new(10000, 2)).to_string(), "Rs. 100");
        assert_eq!(Price::new(Decimal::new(1250, 2)).to_string(), "Rs. 12.5");
        assert_eq!(Price::ZERO.to_string(), "Rs. 0");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from(100).times(2), Price::from(250).times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from(450));
    }

    #[test]
    fn test_arithmetic_saturates_on_overflow() {
        let huge = Price::new(Decimal::from(10_000_000_000_i64));
        assert_eq!(huge.times(i64::MAX), Price::new(Decimal::MAX));

        let max = Price::new(Decimal::MAX);
        assert_eq!(max + Price::from(1), max);
        let total: Price = [max, max, Price::from(5)].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("499.5").unwrap();
        assert_eq!(price.to_string(), "Rs. 499.5");

        let price: Price = serde_json::from_str("300").unwrap();
        assert_eq!(price, Price::from(300));
    }
}
