//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0.1 + 0.2 == 0.30000000000000004   (f64)                               │
//! │  10 + 20   == 30                    (cents)                             │
//! │                                                                         │
//! │  Prices and payments are held in whole cents. Anything derived from a  │
//! │  VAT rate is an exact Decimal and is only rounded for display.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::{format_amount, Money};
//!
//! let price = Money::from_cents(5);              // 0.05
//! let vat = price.to_decimal() * Decimal::new(21, 2);
//! assert_eq!(vat, Decimal::new(105, 4));         // 0.0105, not rounded
//! assert_eq!(format_amount(vat), "0.01");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative amounts exist for validators to reject
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount to Money, rounding half to even at the cent.
    ///
    /// Returns `None` when the amount does not fit in an `i64` of cents.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let amount = Decimal::new(12345, 3); // 12.345
    /// assert_eq!(Money::from_decimal(amount), Some(Money::from_cents(1234)));
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            .checked_mul(Decimal::ONE_HUNDRED)?;
        cents.to_i64().map(Money)
    }

    /// Returns the value as a decimal with two fractional digits.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

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
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two decimals and no currency symbol ("36.30").
///
/// The receipt renderer relies on this, and so does `{:<20}` padding.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let text = format!("{}{}.{:02}", sign, self.major().abs(), self.minor());
        f.pad(&text)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Renders a derived amount for a receipt: rounded half away from zero to
/// two places, always with two decimals ("0.0605" → "0.06").
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

// =============================================================================
// Unit Tests
// =============================================================================
