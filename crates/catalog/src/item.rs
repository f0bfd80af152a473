use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplydesk_core::{DomainError, DomainResult, Entity, StockItemId};

/// A tracked supply with an on-hand quantity.
///
/// `name` is the join key to requisition records (matched case-insensitively)
/// and is unique across the catalog under case-insensitive comparison; the
/// catalog container enforces that, not the item itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub name: String,
    /// Optional free-text identifier; empty means absent. No uniqueness.
    pub code: String,
    /// Non-negative; fractional quantities permitted (e.g. 2.5 reams).
    pub quantity: f64,
    pub unit: String,
    pub updated_at: DateTime<Utc>,
}

impl Entity for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// User-editable stock fields; the caller assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInput {
    pub name: String,
    pub code: String,
    pub quantity: f64,
    pub unit: String,
}

impl StockInput {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("stock item name cannot be empty"));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(DomainError::validation(
                "stock quantity must be a non-negative number",
            ));
        }
        Ok(())
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// The authoritative stock collection.
///
/// Items are kept in insertion order; name-sorted views are derived on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockCatalog {
    items: Vec<StockItem>,
}

impl StockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the catalog from a loaded snapshot.
    pub fn from_items(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: StockItemId) -> Option<&StockItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Case-insensitive exact match on `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&StockItem> {
        self.items.iter().find(|i| names_match(&i.name, name))
    }

    /// Insert a new item from user input.
    ///
    /// Rejects a case-insensitive name collision with any existing item.
    pub fn insert(&mut self, input: StockInput, now: DateTime<Utc>) -> DomainResult<StockItem> {
        input.validate()?;
        if self.find_by_name(&input.name).is_some() {
            return Err(DomainError::duplicate_name(input.name.trim()));
        }

        let item = StockItem {
            id: StockItemId::new(),
            name: input.name.trim().to_string(),
            code: input.code.trim().to_string(),
            quantity: input.quantity,
            unit: input.unit,
            updated_at: now,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    /// Replace all mutable fields of an existing item (absolute quantity, not
    /// a delta).
    ///
    /// A rename may not collide with a *different* item's name; keeping (or
    /// re-casing) the item's own name is fine.
    pub fn update(
        &mut self,
        id: StockItemId,
        input: StockInput,
        now: DateTime<Utc>,
    ) -> DomainResult<StockItem> {
        input.validate()?;
        if self
            .items
            .iter()
            .any(|i| i.id != id && names_match(&i.name, &input.name))
        {
            return Err(DomainError::duplicate_name(input.name.trim()));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(DomainError::NotFound)?;
        item.name = input.name.trim().to_string();
        item.code = input.code.trim().to_string();
        item.quantity = input.quantity;
        item.unit = input.unit;
        item.updated_at = now;
        Ok(item.clone())
    }

    /// Delete the item. Requisition history is never touched here.
    pub fn remove(&mut self, id: StockItemId) -> DomainResult<StockItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.items.remove(pos))
    }

    /// Apply `delta` (positive or negative) to an item's on-hand quantity.
    ///
    /// Rejects any delta that would drive the quantity negative, so this
    /// cannot be used to bypass the deduction check. Returns the new quantity.
    pub fn adjust_quantity(
        &mut self,
        id: StockItemId,
        delta: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<f64> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(DomainError::NotFound)?;

        let new_quantity = item.quantity + delta;
        if new_quantity < 0.0 {
            return Err(DomainError::insufficient_stock(item.quantity, -delta));
        }

        item.quantity = new_quantity;
        item.updated_at = now;
        Ok(new_quantity)
    }

    /// All items sorted case-insensitively by name (stock table view).
    pub fn sorted_by_name(&self) -> Vec<&StockItem> {
        let mut sorted: Vec<&StockItem> = self.items.iter().collect();
        sorted.sort_by_key(|i| i.name.to_lowercase());
        sorted
    }

    /// Item names in insertion order (autocomplete datalist).
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }
}
