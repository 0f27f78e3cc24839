//! Decimal currency amounts.
//!
//! All prices in the quote flow are USD; the server sends plain decimal
//! numbers. `Money` wraps `rust_decimal::Decimal` so that totals are exact
//! and display formatting lives in one place.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A USD amount.
///
/// Serializes as a bare number, matching the quote service wire format
/// (e.g. `7.5` for $7.50).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a money amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format the bare amount to two decimal places, without a symbol
    /// (e.g. `"15.00"`).
    #[must_use]
    pub fn to_amount_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl std::fmt::Display for Money {
    /// Formats as `$<amount>` with two decimal places (e.g. `"$7.50"`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
