//! # Validation Module
//!
//! Input validation for the domain model.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Constructor / setter / mutator                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_*(..) ← THIS MODULE                                          │
//! │       │                                                                 │
//! │       ├── Err(ValidationError) → state untouched, error returned       │
//! │       │                                                                 │
//! │       └── Ok → mutate                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;
use crate::{MAX_CASHIER_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product description text.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_DESCRIPTION_LEN` characters
///
/// ```rust
/// use tally_core::validation::validate_description;
///
/// assert!(validate_description("Widget").is_ok());
/// assert!(validate_description("  ").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates a cashier name.
pub fn validate_cashier_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_CASHIER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_CASHIER_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a password before hashing. Only emptiness is checked.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity handed to a sale mutator.
///
/// ## Rules
/// - Must be non-negative. Zero is accepted: a zero line exists but does
///   not count towards completing the sale.
/// - At most `MAX_LINE_QUANTITY`. The same bound applies to a line's
///   accumulated quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product price.
///
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(0)).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount (must be > 0).
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a VAT rate. Any non-negative rate is accepted, including
/// rates above 100%.
pub fn validate_vat_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
