//! # Register
//!
//! Session façade binding a cashier, a product catalog and the current sale.
//!
//! ## Outcome Model
//! ```text
//! register.enter_item_id(1, 3)
//!        │
//!        ├── no cashier logged in ──► Ok(RegisterOutcome::NotLoggedIn)
//!        ├── no current sale      ──► Ok(RegisterOutcome::NoActiveSale)
//!        ├── domain failure       ──► Err(CoreError::..)
//!        └── success              ──► Ok(RegisterOutcome::Done(..))
//! ```
//!
//! A "not ready" register never changes state and never returns an error:
//! the caller sees exactly why nothing happened. Failures raised by the sale
//! or the catalog still propagate as `Err`.
//!
//! The register owns its catalog and its current sale outright. Nothing is
//! shared through process-wide state.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cashier::Cashier;
use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::payment::Payment;
use crate::product::{ProductDescription, SalesLineItem};
use crate::sale::Sale;

// =============================================================================
// Register Outcome
// =============================================================================

/// Result of a register operation that needs a logged-in cashier (and, for
/// sale operations, a current sale).
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome<T> {
    /// The operation ran.
    Done(T),
    /// No cashier is logged in; nothing happened.
    NotLoggedIn,
    /// A cashier is logged in but no sale has been started; nothing happened.
    NoActiveSale,
}

impl<T> RegisterOutcome<T> {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, RegisterOutcome::Done(_))
    }

    /// `Some(value)` for `Done`, `None` otherwise.
    pub fn into_option(self) -> Option<T> {
        match self {
            RegisterOutcome::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RegisterOutcome<U> {
        match self {
            RegisterOutcome::Done(value) => RegisterOutcome::Done(f(value)),
            RegisterOutcome::NotLoggedIn => RegisterOutcome::NotLoggedIn,
            RegisterOutcome::NoActiveSale => RegisterOutcome::NoActiveSale,
        }
    }
}

// =============================================================================
// Register
// =============================================================================

#[derive(Debug, Clone)]
pub struct Register {
    register_id: i64,
    catalog: ProductCatalog,
    cashier: Option<Cashier>,
    current_sale: Option<Sale>,
}

impl Register {
    /// Creates a logged-out register with no sale.
    pub fn new(register_id: i64, catalog: ProductCatalog) -> Self {
        Register {
            register_id,
            catalog,
            cashier: None,
            current_sale: None,
        }
    }

    #[inline]
    pub fn register_id(&self) -> i64 {
        self.register_id
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs a cashier in.
    ///
    /// ## Errors
    /// `AlreadyLoggedIn` while another cashier (or the same one) is active.
    pub fn log_in(&mut self, cashier: Cashier) -> CoreResult<()> {
        if let Some(active) = &self.cashier {
            warn!(
                register_id = self.register_id,
                active = %active.name(),
                "Login rejected, cashier already active"
            );
            return Err(CoreError::AlreadyLoggedIn(active.name().to_string()));
        }

        info!(
            register_id = self.register_id,
            cashier = %cashier.name(),
            cashier_id = %cashier.id(),
            "Cashier logged in"
        );
        self.cashier = Some(cashier);
        Ok(())
    }

    /// Logs the active cashier out and returns them.
    ///
    /// An open sale is kept and is reachable again after the next login.
    pub fn log_out(&mut self) -> Option<Cashier> {
        let cashier = self.cashier.take();
        if let Some(cashier) = &cashier {
            info!(
                register_id = self.register_id,
                cashier = %cashier.name(),
                open_sale = self.current_sale.as_ref().map_or(false, |s| !s.is_complete()),
                "Cashier logged out"
            );
        }
        cashier
    }

    #[inline]
    pub fn is_logged_in(&self) -> bool {
        self.cashier.is_some()
    }

    pub fn cashier(&self) -> Option<&Cashier> {
        self.cashier.as_ref()
    }

    // =========================================================================
    // Gating
    // =========================================================================

    /// The reason an operation cannot run, if any.
    fn blocked<T>(&self, op: &'static str, needs_sale: bool) -> Option<RegisterOutcome<T>> {
        if self.cashier.is_none() {
            warn!(register_id = self.register_id, op, "No cashier logged in");
            return Some(RegisterOutcome::NotLoggedIn);
        }
        if needs_sale && self.current_sale.is_none() {
            warn!(register_id = self.register_id, op, "No active sale");
            return Some(RegisterOutcome::NoActiveSale);
        }
        None
    }

    /// Runs `f` on the current sale once the register is ready.
    fn with_sale<T, F>(&mut self, op: &'static str, f: F) -> CoreResult<RegisterOutcome<T>>
    where
        F: FnOnce(&mut Sale) -> CoreResult<T>,
    {
        if let Some(outcome) = self.blocked(op, true) {
            return Ok(outcome);
        }

        let register_id = self.register_id;
        let sale = match self.current_sale.as_mut() {
            Some(sale) => sale,
            None => return Ok(RegisterOutcome::NoActiveSale),
        };

        match f(&mut *sale) {
            Ok(value) => Ok(RegisterOutcome::Done(value)),
            Err(e) => {
                warn!(register_id, sale_id = sale.sale_id(), op, error = %e, "Sale operation rejected");
                Err(e)
            }
        }
    }

    fn catalog_entry(&self, item_id: i64) -> CoreResult<SalesLineItem> {
        self.catalog
            .line_item(item_id)
            .ok_or(CoreError::ItemNotFound(item_id))
    }

    // =========================================================================
    // Sale Lifecycle
    // =========================================================================

    /// Starts a new sale, replacing the current one.
    pub fn make_new_sale(&mut self, sale_id: i64) -> RegisterOutcome<()> {
        self.make_new_sale_at(sale_id, Utc::now())
    }

    /// Starts a new sale with an explicit creation date.
    pub fn make_new_sale_at(
        &mut self,
        sale_id: i64,
        created_at: DateTime<Utc>,
    ) -> RegisterOutcome<()> {
        if let Some(outcome) = self.blocked("make_new_sale", false) {
            return outcome;
        }

        if let Some(previous) = &self.current_sale {
            if !previous.is_complete() {
                warn!(
                    register_id = self.register_id,
                    sale_id = previous.sale_id(),
                    "Discarding open sale"
                );
            }
        }

        info!(register_id = self.register_id, sale_id, "Sale started");
        self.current_sale = Some(Sale::with_created_at(sale_id, created_at));
        RegisterOutcome::Done(())
    }

    pub fn enter_item(
        &mut self,
        item: SalesLineItem,
        quantity: i64,
    ) -> CoreResult<RegisterOutcome<()>> {
        self.with_sale("enter_item", |sale| {
            debug!(item_id = item.item_id(), quantity, "enter_item");
            sale.add_item(item, quantity)
        })
    }

    /// Enters the catalog's current entry for `product`'s item id.
    ///
    /// The catalog entry is used even when `product` holds an older price.
    ///
    /// ## Errors
    /// `ItemNotFound` when the catalog has no entry with that id.
    pub fn enter_product(
        &mut self,
        product: &ProductDescription,
        quantity: i64,
    ) -> CoreResult<RegisterOutcome<()>> {
        if let Some(outcome) = self.blocked("enter_product", true) {
            return Ok(outcome);
        }

        let item = self.catalog_entry(product.item_id())?;
        self.with_sale("enter_product", |sale| {
            debug!(item_id = item.item_id(), quantity, "enter_product");
            sale.add_item(item, quantity)
        })
    }

    /// Enters the first catalog entry with `item_id`.
    ///
    /// ## Errors
    /// `ItemNotFound` when the catalog has no entry with `item_id`.
    pub fn enter_item_id(&mut self, item_id: i64, quantity: i64) -> CoreResult<RegisterOutcome<()>> {
        if let Some(outcome) = self.blocked("enter_item_id", true) {
            return Ok(outcome);
        }

        let item = self.catalog_entry(item_id)?;
        self.with_sale("enter_item_id", |sale| {
            debug!(item_id, quantity, "enter_item_id");
            sale.add_item(item, quantity)
        })
    }

    pub fn remove_item(
        &mut self,
        item: &SalesLineItem,
        quantity: i64,
    ) -> CoreResult<RegisterOutcome<()>> {
        self.with_sale("remove_item", |sale| {
            debug!(item_id = item.item_id(), quantity, "remove_item");
            sale.remove_item(item, quantity)
        })
    }

    pub fn remove_product(
        &mut self,
        product: &ProductDescription,
        quantity: i64,
    ) -> CoreResult<RegisterOutcome<()>> {
        let item_id = product.item_id();
        self.with_sale("remove_product", |sale| {
            debug!(item_id, quantity, "remove_product");
            sale.remove_item_id(item_id, quantity)
        })
    }

    pub fn remove_item_id(
        &mut self,
        item_id: i64,
        quantity: i64,
    ) -> CoreResult<RegisterOutcome<()>> {
        self.with_sale("remove_item_id", |sale| {
            debug!(item_id, quantity, "remove_item_id");
            sale.remove_item_id(item_id, quantity)
        })
    }

    pub fn make_payment(&mut self, payment: Payment) -> CoreResult<RegisterOutcome<()>> {
        self.with_sale("make_payment", |sale| {
            debug!(method = %payment.method(), amount = %payment.amount(), "make_payment");
            sale.make_payment(payment)
        })
    }

    /// Completes the current sale.
    ///
    /// ## Returns
    /// - `Done(Some(sale))`: the sale completed; a copy is handed back
    /// - `Done(None)`: the sale is not ready (no items or no payment)
    ///
    /// The completed sale stays current until the next `make_new_sale`.
    ///
    /// ## Errors
    /// `SaleAlreadyCompleted` when the current sale was already completed.
    pub fn end_sale(&mut self) -> CoreResult<RegisterOutcome<Option<Sale>>> {
        let register_id = self.register_id;
        self.with_sale("end_sale", |sale| {
            if !sale.complete()? {
                debug!(register_id, sale_id = sale.sale_id(), "Sale not ready to complete");
                return Ok(None);
            }

            info!(
                register_id,
                sale_id = sale.sale_id(),
                items = sale.item_count(),
                total = %sale.total(),
                "Sale completed"
            );
            Ok(Some(sale.clone()))
        })
    }

    // =========================================================================
    // Accessors (login required)
    // =========================================================================

    pub fn current_sale(&self) -> RegisterOutcome<&Sale> {
        if let Some(outcome) = self.blocked("current_sale", true) {
            return outcome;
        }
        match &self.current_sale {
            Some(sale) => RegisterOutcome::Done(sale),
            None => RegisterOutcome::NoActiveSale,
        }
    }

    pub fn catalog(&self) -> RegisterOutcome<&ProductCatalog> {
        if let Some(outcome) = self.blocked("catalog", false) {
            return outcome;
        }
        RegisterOutcome::Done(&self.catalog)
    }

    /// Mutable access to the catalog. Edits never reach items already in a
    /// sale, see [`ProductCatalog::update`].
    pub fn catalog_mut(&mut self) -> RegisterOutcome<&mut ProductCatalog> {
        if let Some(outcome) = self.blocked("catalog_mut", false) {
            return outcome;
        }
        RegisterOutcome::Done(&mut self.catalog)
    }

    pub fn set_catalog(&mut self, catalog: ProductCatalog) -> RegisterOutcome<()> {
        if let Some(outcome) = self.blocked("set_catalog", false) {
            return outcome;
        }
        info!(register_id = self.register_id, entries = catalog.len(), "Catalog replaced");
        self.catalog = catalog;
        RegisterOutcome::Done(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
