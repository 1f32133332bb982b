//! # Domain Types
//!
//! Small shared types used throughout the domain model.
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │    TaxRate      │   │   SaleStatus    │   │ PaymentMethod   │
//! │  ─────────────  │   │  ─────────────  │   │  ─────────────  │
//! │  Decimal        │   │  Open           │   │  Cash           │
//! │  0.21 = 21%     │   │  Completed      │   │  BankTransfer   │
//! └─────────────────┘   └─────────────────┘   │  Paypal         │
//!                                             │  Payza          │
//!                                             └─────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT rate held as an exact decimal fraction (0.21 = 21%).
///
/// Rates have no upper bound. Negative rates can be built but are rejected
/// by `validate_vat_rate` wherever a product takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from basis points (2100 = 21%).
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(i64::from(bps), 4))
    }

    /// Creates a tax rate from a fraction (0.21 = 21%). No rounding.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_fraction(Decimal::new(2125, 6)); // 0.2125%
    /// assert_eq!(rate.fraction(), Decimal::new(2125, 6));
    /// assert_eq!(rate.to_string(), "0.2125%");
    /// ```
    pub fn from_fraction(fraction: Decimal) -> Self {
        TaxRate(fraction)
    }

    /// Creates a tax rate from a percentage (21 = 21%).
    pub fn from_percentage(pct: Decimal) -> Self {
        TaxRate(pct / Decimal::ONE_HUNDRED)
    }

    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.checked_mul(Decimal::ONE_HUNDRED) {
            Some(pct) => write!(f, "{}%", pct.normalize()),
            None => write!(f, "{}", self.0.normalize()),
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle state of a sale. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Items and payment can still change.
    #[default]
    Open,
    /// Finalized, read-only.
    Completed,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Paypal,
    Payza,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::BankTransfer => write!(f, "bank transfer"),
            PaymentMethod::Paypal => write!(f, "PayPal"),
            PaymentMethod::Payza => write!(f, "Payza"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
