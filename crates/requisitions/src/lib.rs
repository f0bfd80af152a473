//! Requisition ledger domain module.
//!
//! The ledger is the append/edit/delete log of withdrawal records. It has no
//! business rules of its own beyond identity lookup; quantity reconciliation
//! against the stock catalog lives in `supplydesk-reconcile`.

pub mod record;

pub use record::{RequisitionInput, RequisitionLedger, RequisitionRecord};
