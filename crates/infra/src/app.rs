//! Application context: the single owner of both collections.
//!
//! Every mutating user action runs validate → mutate both collections (via
//! the reconciliation engine) → snapshot. Views are pure reads recomputed
//! from current state, so they always see a fully-settled world.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use supplydesk_catalog::{StockCatalog, StockInput, StockItem};
use supplydesk_core::{DomainError, RecordId, StockItemId};
use supplydesk_query::{self as query, DashboardStats, RecordFilter, TopItem};
use supplydesk_reconcile as reconcile;
use supplydesk_requisitions::{RequisitionInput, RequisitionLedger, RequisitionRecord};

use crate::snapshot::{Snapshot, SnapshotError, SnapshotStore};

/// How many bars the dashboard chart shows.
pub const DEFAULT_CHART_ITEMS: usize = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// On-hand availability for an item name being typed into the requisition
/// form.
#[derive(Debug, Clone, PartialEq)]
pub struct StockHint {
    pub on_hand: f64,
    pub unit: String,
    pub out_of_stock: bool,
}

/// Owns the stock catalog, the requisition ledger, the persistence gateway
/// and the current view filter; threads them through every operation.
pub struct App<S: SnapshotStore> {
    catalog: StockCatalog,
    ledger: RequisitionLedger,
    store: S,
    filter: RecordFilter,
}

impl<S: SnapshotStore> App<S> {
    /// Load prior state from the store (empty collections when there is
    /// none).
    pub fn load(store: S) -> Result<Self, SnapshotError> {
        let snapshot = store.load()?;
        info!(
            records = snapshot.records.len(),
            stock = snapshot.stock.len(),
            "state loaded"
        );
        Ok(Self {
            catalog: StockCatalog::from_items(snapshot.stock),
            ledger: RequisitionLedger::from_records(snapshot.records),
            store,
            filter: RecordFilter::default(),
        })
    }

    fn persist(&self) -> Result<(), SnapshotError> {
        self.store.save(&Snapshot {
            records: self.ledger.all().to_vec(),
            stock: self.catalog.items().to_vec(),
        })
    }

    // --- mutations -------------------------------------------------------

    /// Save a requisition (new or edited); new requisitions deduct from a
    /// matching stock item. See `supplydesk_reconcile::submit_requisition`.
    pub fn submit_requisition(
        &mut self,
        input: &RequisitionInput,
        editing: Option<RecordId>,
    ) -> Result<RequisitionRecord, AppError> {
        let record = reconcile::submit_requisition(
            &mut self.catalog,
            &mut self.ledger,
            input,
            editing,
            Utc::now(),
        )?;
        self.persist()?;
        Ok(record)
    }

    /// Delete a requisition, restoring its quantity to any currently
    /// name-matching stock item.
    pub fn delete_requisition(&mut self, id: RecordId) -> Result<RequisitionRecord, AppError> {
        let removed =
            reconcile::delete_requisition(&mut self.catalog, &mut self.ledger, id, Utc::now())?;
        self.persist()?;
        Ok(removed)
    }

    /// Create or edit a stock catalog entry.
    pub fn submit_stock(
        &mut self,
        input: &StockInput,
        editing: Option<StockItemId>,
    ) -> Result<StockItem, AppError> {
        let saved = reconcile::submit_stock(&mut self.catalog, input, editing, Utc::now())?;
        self.persist()?;
        Ok(saved)
    }

    /// Delete a stock catalog entry; requisition history is untouched.
    pub fn delete_stock(&mut self, id: StockItemId) -> Result<StockItem, AppError> {
        let removed = reconcile::delete_stock(&mut self.catalog, id)?;
        self.persist()?;
        Ok(removed)
    }

    // --- view state ------------------------------------------------------

    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    // --- read surface for the presentation layer -------------------------

    /// The filtered, date-descending requisition view (history table).
    pub fn filtered_records(&self) -> Vec<RequisitionRecord> {
        query::filter_records(self.ledger.all(), &self.filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Export view: identical to the current filtered/sorted table. CSV
    /// encoding and delivery are the caller's job.
    pub fn records_for_export(&self) -> Vec<RequisitionRecord> {
        self.filtered_records()
    }

    /// The full stock list sorted case-insensitively by name (stock table).
    pub fn stock_by_name(&self) -> Vec<StockItem> {
        self.catalog
            .sorted_by_name()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Headline dashboard figures for the current filtered view.
    pub fn dashboard(&self) -> DashboardStats {
        let view = query::filter_records(self.ledger.all(), &self.filter);
        query::aggregate(&view, &self.catalog)
    }

    /// Chart series: top `n` items of the filtered view by summed quantity.
    pub fn top_items(&self, n: usize) -> Vec<TopItem> {
        let view = query::filter_records(self.ledger.all(), &self.filter);
        query::top_items(&view, n)
    }

    /// All catalog item names, insertion order (autocomplete datalist).
    pub fn item_names(&self) -> Vec<String> {
        self.catalog
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Availability hint for an item name, resolved case-insensitively
    /// against the catalog. `None` when the name is not tracked.
    pub fn stock_hint(&self, item_name: &str) -> Option<StockHint> {
        self.catalog.find_by_name(item_name).map(|item| StockHint {
            on_hand: item.quantity,
            unit: item.unit.clone(),
            out_of_stock: item.quantity == 0.0,
        })
    }

    pub fn catalog(&self) -> &StockCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &RequisitionLedger {
        &self.ledger
    }
}
