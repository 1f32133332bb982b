//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError                                       ErrorKind              │
//! │  ├── DuplicateEntry      ─────────────────────► AlreadyExists          │
//! │  ├── NotFound            ──┐                                            │
//! │  ├── ItemNotFound        ──┴──────────────────► NotFound               │
//! │  ├── SaleAlreadyCompleted ─┐                                            │
//! │  ├── PaymentAlreadySet   ──┤                                            │
//! │  ├── AlreadyLoggedIn     ──┴──────────────────► InvalidState           │
//! │  ├── AmountOverflow      ──┐                                            │
//! │  └── Validation(ValidationError) ─┴───────────► Invalid                │
//! │                                                                         │
//! │  "Not ready" states of the Register (no cashier, no sale) are NOT      │
//! │  errors: they are RegisterOutcome variants.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, sale id, etc.)
//! 3. A failed operation leaves the aggregate untouched

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An equal entry is already present.
    ///
    /// ## When This Occurs
    /// - Adding a product description the catalog already holds
    /// - Adding a sales line the sale already holds
    #[error("{entity} already exists: {key}")]
    DuplicateEntry { entity: &'static str, key: String },

    /// The entry to remove is not present.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// No sales line (or catalog entry) exists for the item id.
    #[error("No item with id {0}")]
    ItemNotFound(i64),

    /// The sale is completed and can no longer change.
    ///
    /// ## User Workflow
    /// ```text
    /// complete() ──► Completed
    ///      │
    ///      ▼
    /// add_item(..) ──► SaleAlreadyCompleted(sale_id)
    /// ```
    #[error("Sale {0} is already completed")]
    SaleAlreadyCompleted(i64),

    /// A payment is attached and cannot be overridden.
    #[error("Sale {0} already has a payment")]
    PaymentAlreadySet(i64),

    /// A cashier is already logged in to the register.
    #[error("Cashier {0} is already logged in, log out first")]
    AlreadyLoggedIn(String),

    /// An amount derived from prices, VAT rates and quantities no longer
    /// fits the decimal range. Nothing was changed.
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse error category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    InvalidState,
    Invalid,
}

impl CoreError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::DuplicateEntry { .. } => ErrorKind::AlreadyExists,
            CoreError::NotFound { .. } | CoreError::ItemNotFound(_) => ErrorKind::NotFound,
            CoreError::SaleAlreadyCompleted(_)
            | CoreError::PaymentAlreadySet(_)
            | CoreError::AlreadyLoggedIn(_) => ErrorKind::InvalidState,
            CoreError::AmountOverflow(_) | CoreError::Validation(_) => ErrorKind::Invalid,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by constructors and setters before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
