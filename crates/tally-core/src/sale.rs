//! # Sale
//!
//! A single customer transaction: ordered sales lines plus one payment.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new(sale_id)                                                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────┐  add_item / remove_item / add_sales_line /               │
//! │   │  Open   │◄─ remove_sales_line / make_payment / set_sale_id         │
//! │   └────┬────┘                                                           │
//! │        │ complete()                                                     │
//! │        │   lines non-empty AND item_count > 0 AND payment attached     │
//! │        │   otherwise Ok(false), still Open                             │
//! │        ▼                                                                │
//! │   ┌───────────┐                                                         │
//! │   │ Completed │  every mutator and complete() itself                   │
//! │   └───────────┘  → Err(SaleAlreadyCompleted)                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutator checks the state first, then validates its input, and only
//! then touches the lines, so a failed call leaves the sale unchanged.
//!
//! Totals are exact `Decimal`s. A line holds at most `MAX_LINE_QUANTITY`
//! units and a change that would push the sale total past the `Decimal`
//! range fails with `AmountOverflow`, so every read is safe to compute.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

use crate::error::{CoreError, CoreResult};
use crate::money::format_amount;
use crate::payment::Payment;
use crate::product::SalesLineItem;
use crate::types::SaleStatus;
use crate::validation::validate_quantity;
use crate::RECEIPT_WIDTH;

// =============================================================================
// Sales Line
// =============================================================================

/// A quantity of one item within a sale.
///
/// The quantity stays within `0..=MAX_LINE_QUANTITY`. [`SalesLine::remove`]
/// stops at zero and a [`Sale`] drops a line once it gets there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SalesLineRecord")]
pub struct SalesLine {
    item: SalesLineItem,
    quantity: i64,
}

#[derive(Deserialize)]
struct SalesLineRecord {
    item: SalesLineItem,
    quantity: i64,
}

impl TryFrom<SalesLineRecord> for SalesLine {
    type Error = CoreError;

    fn try_from(record: SalesLineRecord) -> CoreResult<Self> {
        SalesLine::new(record.item, record.quantity)
    }
}

/// Sum of `price_after_vat * quantity`, or `None` once it leaves the
/// `Decimal` range.
fn checked_total<'a>(lines: impl Iterator<Item = (&'a SalesLineItem, i64)>) -> Option<Decimal> {
    lines.fold(Some(Decimal::ZERO), |acc, (item, quantity)| {
        acc?.checked_add(item.price_after_vat().checked_mul(Decimal::from(quantity))?)
    })
}

impl SalesLine {
    pub fn new(item: SalesLineItem, quantity: i64) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        if checked_total(iter::once((&item, quantity))).is_none() {
            return Err(CoreError::AmountOverflow(format!(
                "{} x item {}",
                quantity,
                item.item_id()
            )));
        }
        Ok(SalesLine { item, quantity })
    }

    pub fn item(&self) -> &SalesLineItem {
        &self.item
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Adds `quantity` units. Fails without changing the line when the
    /// result would pass `MAX_LINE_QUANTITY` or overflow the line total.
    pub fn add(&mut self, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let updated = SalesLine::new(self.item.clone(), self.quantity.saturating_add(quantity))?;
        self.quantity = updated.quantity;
        Ok(())
    }

    /// Takes off `quantity` units, stopping at zero.
    pub fn remove(&mut self, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        self.quantity = self.quantity.saturating_sub(quantity).max(0);
        Ok(())
    }

    /// `price * quantity`, before VAT.
    pub fn sub_total(&self) -> Decimal {
        self.item.price().to_decimal() * Decimal::from(self.quantity)
    }

    /// `vat * quantity`.
    pub fn total_vat(&self) -> Decimal {
        self.item.vat() * Decimal::from(self.quantity)
    }

    pub fn total(&self) -> Decimal {
        self.sub_total() + self.total_vat()
    }
}

impl fmt::Display for SalesLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:<10}{:<22}{:<22}{:<22}",
            self.item,
            self.quantity,
            format_amount(self.sub_total()),
            format_amount(self.total_vat()),
            format_amount(self.total())
        )
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    sale_id: i64,
    created_at: DateTime<Utc>,
    status: SaleStatus,
    completed_at: Option<DateTime<Utc>>,
    payment: Option<Payment>,
    lines: Vec<SalesLine>,
}

impl Sale {
    /// Opens a sale created now.
    pub fn new(sale_id: i64) -> Self {
        Self::with_created_at(sale_id, Utc::now())
    }

    /// Opens a sale with an explicit creation date.
    pub fn with_created_at(sale_id: i64, created_at: DateTime<Utc>) -> Self {
        Sale {
            sale_id,
            created_at,
            status: SaleStatus::Open,
            completed_at: None,
            payment: None,
            lines: Vec::new(),
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        match self.status {
            SaleStatus::Open => Ok(()),
            SaleStatus::Completed => Err(CoreError::SaleAlreadyCompleted(self.sale_id)),
        }
    }

    fn position_of(&self, item_id: i64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.item().item_id() == item_id)
    }

    fn current_lines(&self) -> impl Iterator<Item = (&SalesLineItem, i64)> {
        self.lines.iter().map(|line| (line.item(), line.quantity()))
    }

    fn ensure_total_fits<'a>(
        &self,
        lines: impl Iterator<Item = (&'a SalesLineItem, i64)>,
    ) -> CoreResult<()> {
        match checked_total(lines) {
            Some(_) => Ok(()),
            None => Err(CoreError::AmountOverflow(format!("sale {} total", self.sale_id))),
        }
    }

    /// Raises the quantity of the line at `index` by `quantity`.
    fn grow_line(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        let grown = self.lines[index].quantity().saturating_add(quantity);
        validate_quantity(grown)?;
        self.ensure_total_fits(self.lines.iter().enumerate().map(|(i, line)| {
            let qty = if i == index { grown } else { line.quantity() };
            (line.item(), qty)
        }))?;

        self.lines[index].quantity = grown;
        Ok(())
    }

    // =========================================================================
    // Mutators (Open only)
    // =========================================================================

    /// Adds `quantity` to the existing line for `item_id`.
    ///
    /// There is no way to create a line from a bare id: without a line the
    /// call fails with `ItemNotFound`. Use [`Sale::add_item`] to start a line.
    pub fn add_item_id(&mut self, item_id: i64, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;
        validate_quantity(quantity)?;

        let index = self
            .position_of(item_id)
            .ok_or(CoreError::ItemNotFound(item_id))?;
        self.grow_line(index, quantity)
    }

    /// Adds `quantity` of `item`, extending its line or starting a new one.
    pub fn add_item(&mut self, item: SalesLineItem, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;
        validate_quantity(quantity)?;

        match self.position_of(item.item_id()) {
            Some(index) => self.grow_line(index, quantity),
            None => {
                let line = SalesLine::new(item, quantity)?;
                self.ensure_total_fits(
                    self.current_lines()
                        .chain(iter::once((line.item(), line.quantity()))),
                )?;
                self.lines.push(line);
                Ok(())
            }
        }
    }

    /// Takes `quantity` off the line for `item_id`, dropping the line once
    /// its quantity reaches zero or below.
    pub fn remove_item_id(&mut self, item_id: i64, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;
        validate_quantity(quantity)?;

        let index = self
            .position_of(item_id)
            .ok_or(CoreError::ItemNotFound(item_id))?;
        self.lines[index].remove(quantity)?;
        if self.lines[index].quantity() <= 0 {
            self.lines.remove(index);
        }
        Ok(())
    }

    pub fn remove_item(&mut self, item: &SalesLineItem, quantity: i64) -> CoreResult<()> {
        self.remove_item_id(item.item_id(), quantity)
    }

    /// Appends a line as-is.
    ///
    /// ## Errors
    /// - `DuplicateEntry` if an equal line (same item, same quantity) exists
    /// - `AmountOverflow` if the sale total would leave the `Decimal` range
    pub fn add_sales_line(&mut self, line: SalesLine) -> CoreResult<()> {
        self.ensure_open()?;

        if self.lines.contains(&line) {
            return Err(CoreError::DuplicateEntry {
                entity: "SalesLine",
                key: line.item().item_id().to_string(),
            });
        }
        self.ensure_total_fits(
            self.current_lines()
                .chain(iter::once((line.item(), line.quantity()))),
        )?;

        self.lines.push(line);
        Ok(())
    }

    /// Removes the line equal to `line`.
    pub fn remove_sales_line(&mut self, line: &SalesLine) -> CoreResult<()> {
        self.ensure_open()?;

        let index = self
            .lines
            .iter()
            .position(|l| l == line)
            .ok_or_else(|| CoreError::NotFound {
                entity: "SalesLine",
                key: line.item().item_id().to_string(),
            })?;
        self.lines.remove(index);
        Ok(())
    }

    /// Attaches the payment. A payment cannot be replaced.
    pub fn make_payment(&mut self, payment: Payment) -> CoreResult<()> {
        self.ensure_open()?;

        if self.payment.is_some() {
            return Err(CoreError::PaymentAlreadySet(self.sale_id));
        }

        self.payment = Some(payment);
        Ok(())
    }

    pub fn set_sale_id(&mut self, sale_id: i64) -> CoreResult<()> {
        self.ensure_open()?;
        self.sale_id = sale_id;
        Ok(())
    }

    /// Completes the sale if it is ready.
    ///
    /// ## Returns
    /// - `Ok(true)`: transitioned to `Completed`
    /// - `Ok(false)`: no lines, no items, or no payment; still `Open`
    /// - `Err(SaleAlreadyCompleted)`: on every call after completion
    pub fn complete(&mut self) -> CoreResult<bool> {
        self.ensure_open()?;

        if !self.is_ready_to_complete() {
            return Ok(false);
        }

        self.status = SaleStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(true)
    }

    // =========================================================================
    // Reads (any state)
    // =========================================================================

    pub fn is_ready_to_complete(&self) -> bool {
        !self.lines.is_empty() && self.item_count() > 0 && self.payment.is_some()
    }

    #[inline]
    pub fn sale_id(&self) -> i64 {
        self.sale_id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[inline]
    pub fn status(&self) -> SaleStatus {
        self.status
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == SaleStatus::Completed
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    pub fn lines(&self) -> &[SalesLine] {
        &self.lines
    }

    pub fn line_items(&self) -> impl Iterator<Item = &SalesLineItem> {
        self.lines.iter().map(SalesLine::item)
    }

    pub fn lines_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity over all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(SalesLine::quantity).sum()
    }

    pub fn sub_total(&self) -> Decimal {
        self.lines.iter().map(SalesLine::sub_total).sum()
    }

    pub fn total_vat(&self) -> Decimal {
        self.lines.iter().map(SalesLine::total_vat).sum()
    }

    pub fn total(&self) -> Decimal {
        self.sub_total() + self.total_vat()
    }

    /// What is still owed: `total - payment`, negative when overpaid.
    pub fn amount_due(&self) -> Decimal {
        match &self.payment {
            Some(payment) => self.total() - payment.amount().to_decimal(),
            None => self.total(),
        }
    }
}

/// Fixed-width receipt table.
impl fmt::Display for Sale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RECEIPT_WIDTH);

        writeln!(
            f,
            "Sale: {}\t- {}",
            self.sale_id,
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(
            f,
            "{:<10}{:<10}{:<50}{:<10}{:<22}{:<22}{:<22}",
            "itemID", "Price", "Description", "Quantity", "Price", "VAT", "Total"
        )?;
        writeln!(f, "{}", rule)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", rule)?;
        write!(
            f,
            "{:<80}{:<22}{:<22}{:<22}",
            "Total",
            format_amount(self.sub_total()),
            format_amount(self.total_vat()),
            format_amount(self.total())
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::product::ProductDescription;
    use crate::types::{PaymentMethod, TaxRate};
    use crate::{ErrorKind, MAX_LINE_QUANTITY};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn item(id: i64, cents: i64) -> SalesLineItem {
        ProductDescription::new(
            id,
            Money::from_cents(cents),
            TaxRate::from_bps(2100),
            format!("Item {}", id),
        )
        .unwrap()
        .into()
    }

    fn cash(cents: i64) -> Payment {
        Payment::new(PaymentMethod::Cash, Money::from_cents(cents)).unwrap()
    }

    #[test]
    fn test_new_sale_is_open() {
        let sale = Sale::new(1);
        assert_eq!(sale.status(), SaleStatus::Open);
        assert!(!sale.is_complete());
        assert!(sale.payment().is_none());
        assert_eq!(sale.lines_count(), 0);
    }

    #[test]
    fn test_totals_widget_times_three() {
        let mut sale = Sale::new(1);
        sale.add_item(item(1, 1000), 3).unwrap();

        assert_eq!(sale.sub_total(), Decimal::new(3000, 2));
        assert_eq!(sale.total_vat(), Decimal::new(630, 2));
        assert_eq!(sale.total(), Decimal::new(3630, 2));
    }

    #[test]
    fn test_fractional_vat_is_not_rounded_per_unit() {
        let mut sale = Sale::new(1);
        let pen = ProductDescription::new(7, Money::from_cents(99), TaxRate::from_bps(600), "Pen")
            .unwrap();
        sale.add_item(pen.into(), 100).unwrap();

        assert_eq!(sale.sub_total(), Decimal::new(9900, 2));
        assert_eq!(sale.total_vat(), Decimal::new(594, 2));
        assert_eq!(sale.total(), Decimal::new(10494, 2));

        let receipt = sale.to_string();
        let totals = receipt.lines().last().unwrap();
        assert_eq!(totals[80..].split_whitespace().collect::<Vec<_>>(), ["99.00", "5.94", "104.94"]);
    }

    #[test]
    fn test_quantity_limit_per_line() {
        let mut sale = Sale::new(1);
        let widget = item(1, 1000);

        let err = sale.add_item(widget.clone(), i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(sale.lines_count(), 0);

        sale.add_item(widget.clone(), MAX_LINE_QUANTITY).unwrap();
        let before = sale.clone();

        assert!(matches!(
            sale.add_item_id(1, 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(sale.add_item(widget, i64::MAX).is_err());
        assert_eq!(sale, before);

        sale.make_payment(cash(100)).unwrap();
        assert_eq!(sale.complete(), Ok(true));
        assert_eq!(sale.item_count(), MAX_LINE_QUANTITY);
        assert_eq!(sale.sub_total(), Decimal::from(10 * MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_sale_total_overflow_is_rejected() {
        let mut sale = Sale::new(5);
        let steep = TaxRate::from_fraction(Decimal::from(100_000));
        let mut accepted = 0;

        for id in 1..=10 {
            let bar = ProductDescription::new(id, Money::from_cents(i64::MAX), steep, "Bar")
                .unwrap();
            match sale.add_item(bar.into(), MAX_LINE_QUANTITY) {
                Ok(()) => accepted += 1,
                Err(err) => {
                    assert!(matches!(err, CoreError::AmountOverflow(_)));
                    break;
                }
            }
        }

        assert_eq!(accepted, 8);
        assert_eq!(sale.lines_count(), 8);

        let before = sale.clone();
        let ninth = ProductDescription::new(9, Money::from_cents(i64::MAX), steep, "Bar").unwrap();
        let line = SalesLine::new(ninth.into(), MAX_LINE_QUANTITY).unwrap();
        assert!(matches!(
            sale.add_sales_line(line),
            Err(CoreError::AmountOverflow(_))
        ));
        assert_eq!(sale, before);

        // Reads stay computable
        assert!(sale.total() > sale.sub_total());
        sale.make_payment(cash(1)).unwrap();
        assert_eq!(sale.complete(), Ok(true));
    }

    #[test]
    fn test_standalone_line_bounds() {
        assert!(SalesLine::new(item(1, 100), -1).is_err());
        assert!(SalesLine::new(item(1, 100), MAX_LINE_QUANTITY + 1).is_err());

        let mut line = SalesLine::new(item(1, 100), 2).unwrap();
        line.add(3).unwrap();
        assert_eq!(line.quantity(), 5);

        assert!(line.add(MAX_LINE_QUANTITY).is_err());
        assert!(line.add(-1).is_err());
        assert_eq!(line.quantity(), 5);

        line.remove(10).unwrap();
        assert_eq!(line.quantity(), 0);
        assert_eq!(line.total(), Decimal::ZERO);
    }

    #[test]
    fn test_line_deserialize_checks_quantity() {
        let line = SalesLine::new(item(1, 100), 2).unwrap();
        let mut value = serde_json::to_value(&line).unwrap();
        assert_eq!(serde_json::from_value::<SalesLine>(value.clone()).unwrap(), line);

        value["quantity"] = serde_json::json!(i64::MAX);
        assert!(serde_json::from_value::<SalesLine>(value).is_err());
    }

    #[test]
    fn test_add_item_merges_lines_by_id() {
        let mut sale = Sale::new(1);
        sale.add_item(item(1, 1000), 2).unwrap();
        sale.add_item(item(1, 1000), 1).unwrap();
        sale.add_item_id(1, 4).unwrap();

        assert_eq!(sale.lines_count(), 1);
        assert_eq!(sale.item_count(), 7);
    }

    #[test]
    fn test_add_item_id_without_line_fails() {
        let mut sale = Sale::new(1);
        assert_eq!(sale.add_item_id(5, 1).unwrap_err(), CoreError::ItemNotFound(5));
        assert_eq!(sale.lines_count(), 0);
    }

    #[test]
    fn test_remove_item_drops_empty_line() {
        let mut sale = Sale::new(1);
        let widget = item(1, 1000);
        sale.add_item(widget.clone(), 3).unwrap();

        sale.remove_item(&widget, 1).unwrap();
        assert_eq!(sale.lines()[0].quantity(), 2);

        sale.remove_item(&widget, 5).unwrap();
        assert_eq!(sale.lines_count(), 0);
    }

    #[test]
    fn test_remove_missing_item_fails() {
        let mut sale = Sale::new(1);
        let err = sale.remove_item_id(9, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut sale = Sale::new(1);
        let err = sale.add_item(item(1, 100), -2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(sale.lines_count(), 0);
    }

    #[test]
    fn test_sales_line_add_remove() {
        let mut sale = Sale::new(1);
        let line = SalesLine::new(item(1, 100), 2).unwrap();

        sale.add_sales_line(line.clone()).unwrap();
        assert_eq!(
            sale.add_sales_line(line.clone()).unwrap_err().kind(),
            ErrorKind::AlreadyExists
        );

        sale.remove_sales_line(&line).unwrap();
        assert_eq!(
            sale.remove_sales_line(&line).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_payment_cannot_be_overridden() {
        let mut sale = Sale::new(3);
        sale.make_payment(cash(100)).unwrap();
        assert_eq!(
            sale.make_payment(cash(200)).unwrap_err(),
            CoreError::PaymentAlreadySet(3)
        );
        assert_eq!(sale.payment().unwrap().amount(), Money::from_cents(100));
    }

    #[test]
    fn test_complete_requires_lines_items_and_payment() {
        // No lines, no payment
        let mut sale = Sale::new(1);
        assert_eq!(sale.complete(), Ok(false));

        // Payment but no lines
        sale.make_payment(cash(100)).unwrap();
        assert_eq!(sale.complete(), Ok(false));

        // Only a zero-quantity line
        sale.add_item(item(1, 100), 0).unwrap();
        assert_eq!(sale.complete(), Ok(false));

        // Lines but no payment
        let mut unpaid = Sale::new(2);
        unpaid.add_item(item(1, 100), 1).unwrap();
        assert_eq!(unpaid.complete(), Ok(false));
        assert!(!unpaid.is_complete());
    }

    #[test]
    fn test_completed_sale_rejects_mutation() {
        let mut sale = Sale::new(8);
        let widget = item(1, 1000);
        sale.add_item(widget.clone(), 1).unwrap();
        sale.make_payment(cash(1210)).unwrap();

        assert_eq!(sale.complete(), Ok(true));
        assert!(sale.is_complete());
        assert!(sale.completed_at().is_some());

        let completed = CoreError::SaleAlreadyCompleted(8);
        assert_eq!(sale.add_item(widget.clone(), 1).unwrap_err(), completed);
        assert_eq!(sale.add_item_id(1, 1).unwrap_err(), completed);
        assert_eq!(sale.remove_item(&widget, 1).unwrap_err(), completed);
        assert_eq!(sale.make_payment(cash(1)).unwrap_err(), completed);
        assert_eq!(sale.set_sale_id(9).unwrap_err(), completed);
        assert_eq!(
            sale.add_sales_line(SalesLine::new(item(2, 5), 1).unwrap()).unwrap_err(),
            completed
        );

        // Reads still work
        assert_eq!(sale.total(), Decimal::new(1210, 2));
        assert_eq!(sale.item_count(), 1);
    }

    #[test]
    fn test_complete_twice_fails_the_same_way() {
        let mut sale = Sale::new(4);
        sale.add_item(item(1, 100), 1).unwrap();
        sale.make_payment(cash(121)).unwrap();
        sale.complete().unwrap();
        let completed_at = sale.completed_at();

        for _ in 0..3 {
            assert_eq!(sale.complete(), Err(CoreError::SaleAlreadyCompleted(4)));
        }
        assert_eq!(sale.completed_at(), completed_at);
    }

    #[test]
    fn test_amount_due() {
        let mut sale = Sale::new(1);
        sale.add_item(item(1, 1000), 1).unwrap();
        assert_eq!(sale.amount_due(), Decimal::new(1210, 2));

        sale.make_payment(cash(1500)).unwrap();
        assert_eq!(sale.amount_due(), Decimal::new(-290, 2));
    }

    #[test]
    fn test_receipt_rendering() {
        let created = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        let mut sale = Sale::with_created_at(12, created);
        sale.add_item(item(1, 1000), 3).unwrap();

        let receipt = sale.to_string();
        let rows: Vec<&str> = receipt.lines().collect();

        assert_eq!(rows[0], "Sale: 12\t- 2024-05-17 09:30:00");
        assert!(rows[1].starts_with("itemID    Price     Description"));
        assert_eq!(rows[2], "-".repeat(RECEIPT_WIDTH));
        assert!(rows[3].starts_with("1         10.00     Item 1"));
        assert_eq!(&rows[3][70..80], "3         ");
        assert_eq!(rows[3][80..].split_whitespace().collect::<Vec<_>>(), ["30.00", "6.30", "36.30"]);
        assert_eq!(rows[4], "-".repeat(RECEIPT_WIDTH));
        assert!(rows[5].starts_with("Total"));
        assert_eq!(rows[5][80..].split_whitespace().collect::<Vec<_>>(), ["30.00", "6.30", "36.30"]);
    }

    #[test]
    fn test_sale_serializes() {
        let mut sale = Sale::new(1);
        sale.add_item(item(1, 100), 2).unwrap();
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["lines"][0]["quantity"], 2);
    }

    proptest! {
        #[test]
        fn prop_add_then_remove(q1 in 0i64..500, q2 in 0i64..500) {
            prop_assume!(q2 <= q1);
            let mut sale = Sale::new(1);
            let widget = item(1, 100);

            sale.add_item(widget.clone(), q1).unwrap();
            sale.remove_item(&widget, q2).unwrap();

            let remaining = q1 - q2;
            if remaining <= 0 {
                prop_assert_eq!(sale.lines_count(), 0);
            } else {
                prop_assert_eq!(sale.lines()[0].quantity(), remaining);
            }
        }

        #[test]
        fn prop_complete_only_when_ready(qty in 0i64..5, paid in any::<bool>()) {
            let mut sale = Sale::new(1);
            if qty > 0 {
                sale.add_item(item(1, 100), qty).unwrap();
            }
            if paid {
                sale.make_payment(cash(100)).unwrap();
            }

            let expected = qty > 0 && paid;
            prop_assert_eq!(sale.complete(), Ok(expected));
            prop_assert_eq!(sale.is_complete(), expected);
        }

        #[test]
        fn prop_totals_are_line_sums(
            lines in proptest::collection::vec((1i64..50, 0i64..10_000, 1i64..20), 1..8)
        ) {
            let mut sale = Sale::new(1);
            for (id, cents, qty) in &lines {
                sale.add_item(item(*id, *cents), *qty).unwrap();
            }
            let expected: Decimal = sale.lines().iter().map(|l| l.sub_total()).sum();
            prop_assert_eq!(sale.sub_total(), expected);
            prop_assert_eq!(sale.total(), sale.sub_total() + sale.total_vat());
        }

        #[test]
        fn prop_line_total_scales_price_after_vat(
            cents in 0i64..1_000_000,
            bps in 0u32..30_000,
            qty in 1i64..10_000,
        ) {
            let product = ProductDescription::new(1, Money::from_cents(cents), TaxRate::from_bps(bps), "Item")
                .unwrap();
            let line = SalesLine::new(product.clone().into(), qty).unwrap();
            prop_assert_eq!(line.total(), product.price_after_vat() * Decimal::from(qty));
            prop_assert_eq!(line.total_vat(), product.vat() * Decimal::from(qty));
        }
    }
}
