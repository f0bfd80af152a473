use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use supplydesk_core::{DomainError, DomainResult, Entity, RecordId};

/// One withdrawal of a quantity of an item by a requester.
///
/// `item_name` is a soft reference to a catalog entry (case-insensitive name
/// match); it may be dangling — ad-hoc items that were never put in the
/// catalog are permitted. `date` is the user-entered requisition date;
/// `timestamp` is the machine instant of creation or last save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionRecord {
    pub id: RecordId,
    pub requester: String,
    pub department: String,
    pub date: NaiveDate,
    pub item_name: String,
    /// Free-text item code; empty means absent.
    pub item_code: String,
    pub quantity: f64,
    pub unit: String,
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

impl Entity for RequisitionRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// User-editable requisition fields; ids and timestamps are assigned by the
/// reconciliation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionInput {
    pub requester: String,
    pub department: String,
    pub date: NaiveDate,
    pub item_name: String,
    pub item_code: String,
    pub quantity: f64,
    pub unit: String,
    pub note: String,
}

impl RequisitionInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.requester.trim().is_empty() {
            return Err(DomainError::validation("requester cannot be empty"));
        }
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(DomainError::validation(
                "requisition quantity must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// The requisition history, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequisitionLedger {
    records: Vec<RequisitionRecord>,
}

impl RequisitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from a loaded snapshot.
    pub fn from_records(records: Vec<RequisitionRecord>) -> Self {
        Self { records }
    }

    pub fn all(&self) -> &[RequisitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&RequisitionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn add(&mut self, record: RequisitionRecord) {
        self.records.push(record);
    }

    /// Replace the record with `id` in place (position preserved).
    pub fn replace(&mut self, id: RecordId, record: RequisitionRecord) -> DomainResult<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound)?;
        *slot = record;
        Ok(())
    }

    pub fn remove(&mut self, id: RecordId) -> DomainResult<RequisitionRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.records.remove(pos))
    }
}
