//! Rial amounts using decimal arithmetic.
//!
//! The marketplace quotes every price in Iranian rials as a JSON number.
//! Amounts are kept as [`Decimal`] so that line totals and sums never pick up
//! floating-point noise before they are rendered.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in Iranian rials.
///
/// Deserializes from either a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rial(Decimal);

impl Rial {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of rials.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Amount multiplied by a quantity (line total).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format with thousands separators, rounded to whole rials.
    ///
    /// ```
    /// use bazaar_core::Rial;
    ///
    /// assert_eq!(Rial::from_whole(1_250_000).grouped(), "1,250,000");
    /// assert_eq!(Rial::from_whole(-4500).grouped(), "-4,500");
    /// ```
    #[must_use]
    pub fn grouped(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().trunc().to_string();

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Rial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped())
    }
}

impl Add for Rial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Rial {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Rial {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_small_amounts() {
        assert_eq!(Rial::ZERO.grouped(), "0");
        assert_eq!(Rial::from_whole(999).grouped(), "999");
        assert_eq!(Rial::from_whole(1000).grouped(), "1,000");
    }

    #[test]
    fn test_grouped_rounds_fractional_rials() {
        let amount = Rial::new(Decimal::new(4_999_995, 1)); // 499999.5
        assert_eq!(amount.grouped(), "500,000");
    }

    #[test]
    fn test_times_quantity() {
        assert_eq!(Rial::from_whole(49_000).times(3), Rial::from_whole(147_000));
        assert_eq!(Rial::from_whole(49_000).times(0), Rial::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Rial = [10, 20, 30].into_iter().map(Rial::from_whole).sum();
        assert_eq!(total, Rial::from_whole(60));
    }

    #[test]
    fn test_deserializes_from_number_and_string() {
        let from_number: Rial = serde_json::from_str("125000").unwrap();
        let from_float: Rial = serde_json::from_str("125000.0").unwrap();
        let from_string: Rial = serde_json::from_str("\"125000\"").unwrap();
        assert_eq!(from_number, Rial::from_whole(125_000));
        assert_eq!(from_float, Rial::from_whole(125_000));
        assert_eq!(from_string, Rial::from_whole(125_000));
    }
}
