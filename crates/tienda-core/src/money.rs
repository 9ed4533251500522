//! # Money
//!
//! Every stored amount (unit prices, sale totals, daily sums) is a whole
//! number of cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ledger (exact)                      Statistics (approximate)          │
//! │  ──────────────────────────          ─────────────────────────────     │
//! │  unit_price  Money(1250)             mean of daily totals      f64     │
//! │  × quantity  3                       population std dev        f64     │
//! │  = total     Money(3750)  ──────►    Pearson coefficient       f64     │
//! │                       to_major_units()                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Summing a month of sales as doubles drifts by fractions of a cent; summing
//! cents doesn't. Floats appear only once a value leaves the ledger.
//!
//! ```rust
//! use tienda_core::money::Money;
//!
//! let total = Money::from_cents(1250).multiply_quantity(3);
//! assert_eq!(total.cents(), 3750);
//! assert_eq!(total.to_string(), "$37.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// An amount in cents. Serialized as the bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Cents past the whole unit, always 0-99.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// `Money::from_cents(1050)` becomes `10.5`.
    ///
    /// For statistics and display only; never store the result.
    #[inline]
    pub fn to_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Line total for `qty` units at this unit price.
    ///
    /// Saturates at the `i64` bounds. Use
    /// [`checked_multiply_quantity`](Self::checked_multiply_quantity) where an
    /// overflowed total must be rejected.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Line total, or `None` if it doesn't fit in `i64` cents.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `$10.99`, `-$5.50`. Honors width and alignment flags.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        f.pad(&format!("{}${}.{:02}", sign, self.major().abs(), self.minor()))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).sum())
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
    fn test_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);

        let negative = Money::from_cents(-550);
        assert_eq!(negative.major(), -5);
        assert_eq!(negative.minor(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(format!("{:>8}", Money::from_cents(1099)), "  $10.99");
    }

    #[test]
    fn test_line_arithmetic() {
        let price = Money::from_cents(1250);
        assert_eq!(price.multiply_quantity(3).cents(), 3750);
        assert_eq!(price * 3, price.multiply_quantity(3));
        assert_eq!((price + Money::from_cents(50)).cents(), 1300);
        assert_eq!((price - Money::from_cents(250)).cents(), 1000);

        let mut running = Money::zero();
        running += price;
        running += price;
        assert_eq!(running.cents(), 2500);
    }

    #[test]
    fn test_line_total_overflow() {
        let price = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(price.checked_multiply_quantity(2), None);
        assert_eq!(price.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!(
            Money::from_cents(i64::MAX / 2).checked_multiply_quantity(2),
            Some(Money::from_cents(i64::MAX - 1))
        );
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(100), Money::from_cents(250)];
        let by_ref: Money = amounts.iter().sum();
        let by_value: Money = amounts.into_iter().sum();
        assert_eq!(by_ref.cents(), 350);
        assert_eq!(by_value, by_ref);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
        assert!(!empty.is_positive());
    }

    #[test]
    fn test_to_major_units() {
        assert!((Money::from_cents(1050).to_major_units() - 10.5).abs() < 1e-9);
        assert!((Money::from_cents(-1).to_major_units() + 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_as_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(3750)).unwrap(), "3750");
        let back: Money = serde_json::from_str("3750").unwrap();
        assert_eq!(back.cents(), 3750);
    }
}
