//! # Product Catalog
//!
//! The set of product descriptions a register sells from.
//!
//! Entries are unique by equality, not by item id: two descriptions that
//! share an id but differ in price are both accepted. Lookups by id return
//! the first match in insertion order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::product::{ProductDescription, SalesLineItem};

const ENTITY: &str = "ProductDescription";

/// In-memory product catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    entries: Vec<Arc<ProductDescription>>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog::default()
    }

    /// Adds a description.
    ///
    /// ## Errors
    /// `DuplicateEntry` if an equal description is already present.
    pub fn add(&mut self, description: ProductDescription) -> CoreResult<()> {
        if self.contains(&description) {
            return Err(CoreError::DuplicateEntry {
                entity: ENTITY,
                key: description.item_id().to_string(),
            });
        }

        self.entries.push(Arc::new(description));
        Ok(())
    }

    /// Removes the description equal to `description`.
    ///
    /// ## Errors
    /// `NotFound` if no equal description is present.
    pub fn remove(&mut self, description: &ProductDescription) -> CoreResult<()> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.as_ref() == description)
            .ok_or_else(|| CoreError::NotFound {
                entity: ENTITY,
                key: description.item_id().to_string(),
            })?;

        self.entries.remove(position);
        Ok(())
    }

    /// Removes every description with `item_id`.
    ///
    /// Never fails. Returns how many descriptions were removed, which is 0
    /// when nothing matched.
    pub fn remove_by_id(&mut self, item_id: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.item_id() != item_id);
        before - self.entries.len()
    }

    /// Returns the first description with `item_id`.
    pub fn get_by_id(&self, item_id: i64) -> Option<&Arc<ProductDescription>> {
        self.entries.iter().find(|entry| entry.item_id() == item_id)
    }

    /// Builds a line item for the first description with `item_id`.
    pub fn line_item(&self, item_id: i64) -> Option<SalesLineItem> {
        self.get_by_id(item_id)
            .map(|entry| SalesLineItem::new(Arc::clone(entry)))
    }

    /// Edits the first description with `item_id` in place.
    ///
    /// Line items created before the edit keep the previous description.
    ///
    /// ## Errors
    /// - `ItemNotFound` when no description has `item_id`
    /// - whatever `edit` returns; the catalog entry is left as it was
    pub fn update<F>(&mut self, item_id: i64, edit: F) -> CoreResult<()>
    where
        F: FnOnce(&mut ProductDescription) -> CoreResult<()>,
    {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.item_id() == item_id)
            .ok_or(CoreError::ItemNotFound(item_id))?;

        let mut edited = (**entry).clone();
        edit(&mut edited)?;
        *entry = Arc::new(edited);
        Ok(())
    }

    pub fn contains(&self, description: &ProductDescription) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.as_ref() == description)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProductDescription>> {
        self.entries.iter()
    }
}

impl FromIterator<ProductDescription> for ProductCatalog {
    /// Collects descriptions, skipping (and logging) duplicates.
    fn from_iter<I: IntoIterator<Item = ProductDescription>>(iter: I) -> Self {
        let mut catalog = ProductCatalog::new();
        for description in iter {
            let item_id = description.item_id();
            if let Err(e) = catalog.add(description) {
                debug!(item_id, error = %e, "Skipping catalog entry");
            }
        }
        catalog
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
