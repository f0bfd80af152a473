//! Query pipeline: derived, read-only views over the requisition ledger and
//! the stock catalog.
//!
//! Nothing here mutates domain state; every function recomputes its result
//! from the collections it is given, so views always reflect a fully-settled
//! state.

pub mod pipeline;

pub use pipeline::{
    filter_records, aggregate, top_items, DashboardStats, RecordFilter, TopItem,
    LOW_STOCK_THRESHOLD,
};
