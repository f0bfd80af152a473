use chrono::{DateTime, Utc};
use tracing::{debug, info};

use supplydesk_catalog::{StockCatalog, StockInput, StockItem};
use supplydesk_core::{DomainError, DomainResult, RecordId, StockItemId};
use supplydesk_requisitions::{RequisitionInput, RequisitionLedger, RequisitionRecord};

fn build_record(id: RecordId, input: &RequisitionInput, now: DateTime<Utc>) -> RequisitionRecord {
    RequisitionRecord {
        id,
        requester: input.requester.trim().to_string(),
        department: input.department.trim().to_string(),
        date: input.date,
        item_name: input.item_name.trim().to_string(),
        item_code: input.item_code.trim().to_string(),
        quantity: input.quantity,
        unit: input.unit.clone(),
        note: input.note.trim().to_string(),
        timestamp: now,
    }
}

/// Save a requisition, deducting from stock when it targets a tracked item.
///
/// With `editing` set, the identified ledger record is rewritten in place
/// (same id, fresh `timestamp`) and stock quantities are **never** touched,
/// even if the item name or quantity changed: the original deduction, if any,
/// cannot be safely un-applied without a change log, so edits are
/// side-effect-free with respect to stock.
///
/// A new requisition against a catalog item deducts its quantity from that
/// item, failing with `InsufficientStock` when the on-hand quantity does not
/// cover it. A new requisition naming no catalog item is recorded as-is
/// (ad-hoc item, no stock effect).
pub fn submit_requisition(
    catalog: &mut StockCatalog,
    ledger: &mut RequisitionLedger,
    input: &RequisitionInput,
    editing: Option<RecordId>,
    now: DateTime<Utc>,
) -> DomainResult<RequisitionRecord> {
    input.validate()?;

    if let Some(id) = editing {
        let record = build_record(id, input, now);
        ledger.replace(id, record.clone())?;
        info!(record_id = %id, "requisition edited; stock left untouched");
        return Ok(record);
    }

    let record = build_record(RecordId::new(), input, now);

    if let Some(stock) = catalog.find_by_name(&record.item_name) {
        if stock.quantity < record.quantity {
            return Err(DomainError::insufficient_stock(
                stock.quantity,
                record.quantity,
            ));
        }
        let stock_id = stock.id;
        // Cannot fail: the availability check above keeps the result >= 0.
        catalog.adjust_quantity(stock_id, -record.quantity, now)?;
        info!(
            record_id = %record.id,
            stock_id = %stock_id,
            quantity = record.quantity,
            "requisition saved, stock deducted"
        );
    } else {
        debug!(record_id = %record.id, item = %record.item_name, "ad-hoc item, no stock effect");
    }

    ledger.add(record.clone());
    Ok(record)
}

/// Delete a requisition, restoring its quantity to any catalog item whose
/// name currently matches.
///
/// Restoration is keyed on the *current* name-match state, not on whether a
/// deduction actually happened at creation time: deleting a requisition that
/// was ad-hoc when submitted will still credit a same-named item added to the
/// catalog later. That asymmetry is an accepted product trade-off.
pub fn delete_requisition(
    catalog: &mut StockCatalog,
    ledger: &mut RequisitionLedger,
    id: RecordId,
    now: DateTime<Utc>,
) -> DomainResult<RequisitionRecord> {
    let record = ledger.get(id).ok_or(DomainError::NotFound)?.clone();

    if let Some(stock) = catalog.find_by_name(&record.item_name) {
        let stock_id = stock.id;
        catalog.adjust_quantity(stock_id, record.quantity, now)?;
        info!(
            record_id = %id,
            stock_id = %stock_id,
            quantity = record.quantity,
            "requisition deleted, quantity restored to stock"
        );
    }

    ledger.remove(id)
}

/// Create or edit a stock catalog entry.
///
/// With `editing` set, all mutable fields (name, code, quantity, unit) of the
/// identified item are replaced; quantity is absolute, not a delta, and no
/// re-deduction against the ledger happens. A rename may not collide with a
/// different item's case-insensitive name. Without `editing`, a new item is
/// created, rejecting any case-insensitive name collision.
pub fn submit_stock(
    catalog: &mut StockCatalog,
    input: &StockInput,
    editing: Option<StockItemId>,
    now: DateTime<Utc>,
) -> DomainResult<StockItem> {
    let saved = match editing {
        Some(id) => catalog.update(id, input.clone(), now)?,
        None => catalog.insert(input.clone(), now)?,
    };
    info!(stock_id = %saved.id, name = %saved.name, quantity = saved.quantity, "stock saved");
    Ok(saved)
}

/// Delete a stock catalog entry. Requisition history is left untouched
/// (history is independent of catalog membership).
pub fn delete_stock(catalog: &mut StockCatalog, id: StockItemId) -> DomainResult<StockItem> {
    let removed = catalog.remove(id)?;
    info!(stock_id = %id, name = %removed.name, "stock deleted; ledger untouched");
    Ok(removed)
}
