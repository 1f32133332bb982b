//! # Products
//!
//! `ProductDescription` is the catalog's record of something sellable.
//! `SalesLineItem` is the read-only view of a description that a sale holds.
//!
//! ## Snapshot Pattern
//! ```text
//! ProductCatalog                         Sale
//! ──────────────                         ────
//! Arc<ProductDescription> ──clone Arc──► SalesLineItem ──► SalesLine
//!        │
//!        ▼ catalog.update(..) (copy-on-write)
//! new Arc<ProductDescription>           (line keeps the old Arc: price frozen)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{validate_description, validate_price, validate_vat_rate};

// =============================================================================
// Product Description
// =============================================================================

/// A sellable item's price, VAT rate and description.
///
/// ## Invariants
/// - `price >= 0`
/// - `vat_rate >= 0`, no upper bound
/// - `price_after_vat()` fits a `Decimal`
/// - `description` non-empty
///
/// Deserializing goes through [`ProductDescription::new`], so the
/// invariants hold for decoded values too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct ProductDescription {
    item_id: i64,
    price: Money,
    vat_rate: TaxRate,
    description: String,
}

impl ProductDescription {
    /// Creates a validated product description.
    ///
    /// ```rust
    /// use tally_core::{Money, ProductDescription, TaxRate};
    ///
    /// let widget = ProductDescription::new(1, Money::from_cents(1000), TaxRate::from_bps(2100), "Widget").unwrap();
    /// assert_eq!(widget.vat().to_string(), "2.100000");
    /// assert_eq!(widget.price_after_vat().normalize().to_string(), "12.1");
    /// ```
    pub fn new(
        item_id: i64,
        price: Money,
        vat_rate: TaxRate,
        description: impl Into<String>,
    ) -> CoreResult<Self> {
        let description = description.into();
        validate_price(price)?;
        validate_vat_rate(vat_rate)?;
        validate_description(&description)?;
        ensure_representable(item_id, price, vat_rate)?;

        Ok(ProductDescription {
            item_id,
            price,
            vat_rate,
            description,
        })
    }

    #[inline]
    pub fn item_id(&self) -> i64 {
        self.item_id
    }

    /// Price before VAT.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn vat_rate(&self) -> TaxRate {
        self.vat_rate
    }

    /// VAT on one unit: `price * vat_rate`, exact.
    pub fn vat(&self) -> Decimal {
        self.price.to_decimal() * self.vat_rate.fraction()
    }

    /// `price + vat()`, exact.
    pub fn price_after_vat(&self) -> Decimal {
        self.price.to_decimal() + self.vat()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_item_id(&mut self, item_id: i64) {
        self.item_id = item_id;
    }

    pub fn set_price(&mut self, price: Money) -> CoreResult<()> {
        validate_price(price)?;
        ensure_representable(self.item_id, price, self.vat_rate)?;
        self.price = price;
        Ok(())
    }

    pub fn set_vat_rate(&mut self, vat_rate: TaxRate) -> CoreResult<()> {
        validate_vat_rate(vat_rate)?;
        ensure_representable(self.item_id, self.price, vat_rate)?;
        self.vat_rate = vat_rate;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> CoreResult<()> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        Ok(())
    }
}

/// `price + price * vat_rate`, or `None` when it leaves the `Decimal` range.
fn checked_price_after_vat(price: Money, vat_rate: TaxRate) -> Option<Decimal> {
    let price = price.to_decimal();
    price.checked_add(price.checked_mul(vat_rate.fraction())?)
}

fn ensure_representable(item_id: i64, price: Money, vat_rate: TaxRate) -> CoreResult<()> {
    checked_price_after_vat(price, vat_rate)
        .map(|_| ())
        .ok_or_else(|| {
            CoreError::AmountOverflow(format!(
                "item {} at {} with VAT {}",
                item_id, price, vat_rate
            ))
        })
}

#[derive(Deserialize)]
struct ProductRecord {
    item_id: i64,
    price: Money,
    vat_rate: TaxRate,
    description: String,
}

impl TryFrom<ProductRecord> for ProductDescription {
    type Error = CoreError;

    fn try_from(record: ProductRecord) -> CoreResult<Self> {
        ProductDescription::new(
            record.item_id,
            record.price,
            record.vat_rate,
            record.description,
        )
    }
}

// =============================================================================
// Sales Line Item
// =============================================================================

/// Read-only view binding a `ProductDescription` into a sale.
///
/// Holds the description behind an `Arc`, so the line item sees the
/// description exactly as it was when the item was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLineItem {
    description: Arc<ProductDescription>,
}

impl SalesLineItem {
    pub fn new(description: Arc<ProductDescription>) -> Self {
        SalesLineItem { description }
    }

    #[inline]
    pub fn item_id(&self) -> i64 {
        self.description.item_id()
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.description.price()
    }

    #[inline]
    pub fn vat(&self) -> Decimal {
        self.description.vat()
    }

    #[inline]
    pub fn vat_rate(&self) -> TaxRate {
        self.description.vat_rate()
    }

    #[inline]
    pub fn price_after_vat(&self) -> Decimal {
        self.description.price_after_vat()
    }

    pub fn description(&self) -> &str {
        self.description.description()
    }

    /// The underlying product description.
    pub fn product(&self) -> &Arc<ProductDescription> {
        &self.description
    }
}

impl From<ProductDescription> for SalesLineItem {
    fn from(description: ProductDescription) -> Self {
        SalesLineItem::new(Arc::new(description))
    }
}

impl From<Arc<ProductDescription>> for SalesLineItem {
    fn from(description: Arc<ProductDescription>) -> Self {
        SalesLineItem::new(description)
    }
}

/// Receipt columns: id (10), unit price (10), description (50).
impl fmt::Display for SalesLineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10}{:<10}{:<50}",
            self.item_id(),
            self.price(),
            self.description()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
