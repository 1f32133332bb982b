//! # tally-core: Point-of-Sale Domain Model
//!
//! This crate is the **heart** of Tally POS. It models a till session as plain
//! Rust values with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Domain Model                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        Register (façade)                        │   │
//! │  │   log_in ──► make_new_sale ──► enter_item ──► make_payment ──►  │   │
//! │  │                                                     end_sale    │   │
//! │  └───────┬──────────────────────┬──────────────────────┬──────────┘   │
//! │          │                      │                      │               │
//! │  ┌───────▼──────┐      ┌────────▼───────┐      ┌───────▼───────┐      │
//! │  │   Cashier    │      │      Sale      │      │ProductCatalog │      │
//! │  │ uuid + md5   │      │ Open→Completed │      │ descriptions  │      │
//! │  └──────────────┘      │ SalesLine[]    │      └───────┬───────┘      │
//! │                        │ Payment?       │              │              │
//! │                        └────────┬───────┘              │              │
//! │                                 │                      │              │
//! │                        ┌────────▼───────┐      ┌───────▼───────┐      │
//! │                        │  SalesLineItem │─────►│ProductDescr.  │      │
//! │                        │ (Arc snapshot) │      │ price, VAT    │      │
//! │                        └────────────────┘      └───────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in whole cents (no floating point!)
//! - [`types`] - Small shared enums and the decimal VAT rate
//! - [`product`] - Product descriptions and the line items built from them
//! - [`catalog`] - The product catalog a register sells from
//! - [`payment`] - Payment value object
//! - [`cashier`] - Cashier identity and credentials
//! - [`sale`] - Sales lines and the sale state machine
//! - [`register`] - Session façade tying it all together
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{
//!     Cashier, Money, Payment, PaymentMethod, ProductCatalog, ProductDescription, Register,
//!     TaxRate,
//! };
//!
//! let mut catalog = ProductCatalog::new();
//! catalog
//!     .add(ProductDescription::new(1, Money::from_cents(1000), TaxRate::from_bps(2100), "Widget").unwrap())
//!     .unwrap();
//!
//! let mut register = Register::new(1, catalog);
//! register.log_in(Cashier::new("Ann", "secret").unwrap()).unwrap();
//! assert!(register.make_new_sale(42).is_done());
//! assert!(register.enter_item_id(1, 3).unwrap().is_done());
//!
//! let payment = Payment::new(PaymentMethod::Cash, Money::from_cents(3630)).unwrap();
//! assert!(register.make_payment(payment).unwrap().is_done());
//!
//! let sale = register.end_sale().unwrap().into_option().flatten().unwrap();
//! assert_eq!(sale.total(), Decimal::new(3630, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashier;
pub mod catalog;
pub mod error;
pub mod money;
pub mod payment;
pub mod product;
pub mod register;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cashier::Cashier;
pub use catalog::ProductCatalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use payment::Payment;
pub use product::{ProductDescription, SalesLineItem};
pub use register::{Register, RegisterOutcome};
pub use sale::{Sale, SalesLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Largest quantity a single sales line can hold.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Maximum length of a cashier name.
pub const MAX_CASHIER_NAME_LEN: usize = 100;

/// Width of the dashed rule in a rendered receipt.
pub const RECEIPT_WIDTH: usize = 135;
