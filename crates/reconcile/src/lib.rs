//! Reconciliation engine: the rules that keep the requisition ledger and the
//! stock catalog mutually consistent across create/edit/delete operations.
//!
//! Every mutating user action goes through this crate. All validation
//! failures are raised before any mutation is applied, so from the caller's
//! point of view each entry point updates both collections atomically or not
//! at all.

pub mod engine;

pub use engine::{
    delete_requisition, delete_stock, submit_requisition, submit_stock,
};
