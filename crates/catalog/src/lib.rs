//! Stock catalog domain module.
//!
//! This crate contains the authoritative set of stock-keeping items and the
//! container-level invariants over it, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{StockCatalog, StockInput, StockItem};
