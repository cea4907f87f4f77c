//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  The system this replaces computed totals as floats:                │
//! │    1000.00 / 3 = 333.333… → toFixed(2) per backend, per dialect     │
//! │    Two storage dialects, two rounding paths, cent drift.            │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    110000 cents / 3 = 36666.67 → round half up → 36667 cents        │
//! │    The last installment absorbs the remainder explicitly.           │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every monetary value in the system flows through this type: unit prices,
//! line totals, sale totals, installment amounts, payments, balances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::InterestRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate subtractions may dip below zero before
///   clamping (e.g. financed amount = total − down payment, floored at 0)
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Round half up**: the one rounding rule, applied at every division
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Returns `self` floored at zero.
    ///
    /// Financed amounts and running balances floor at zero rather than
    /// going negative.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(12000); // $120.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 36000); // $360.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes the interest portion for a rate, rounded half up to the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount_cents * bps + 5000) / 10000`.
    /// The +5000 provides round-half-up (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    /// use fiado_core::types::InterestRate;
    ///
    /// let base = Money::from_cents(100_000);     // $1000.00
    /// let rate = InterestRate::from_bps(1000);   // 10%
    /// assert_eq!(base.interest(rate).cents(), 10_000); // $100.00
    /// ```
    pub fn interest(&self, rate: InterestRate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Returns `self` plus interest at the given rate.
    pub fn add_interest(&self, rate: InterestRate) -> Money {
        *self + self.interest(rate)
    }

    /// Divides into `count` parts, rounding half up to the cent.
    ///
    /// Returns the per-part amount; the caller assigns the remainder
    /// (`self - part * (count - 1)`) to the final part so the whole always
    /// reconstructs exactly. See [`crate::schedule::generate`].
    pub fn divided_by(&self, count: i64) -> Money {
        debug_assert!(count > 0);
        let cents = (self.0 as i128 * 2 + count as i128) / (count as i128 * 2);
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and debugging; the API serializes cents.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
