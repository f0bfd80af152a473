//! Infrastructure layer: snapshot persistence and the application context.

pub mod app;
pub mod snapshot;


pub use app::{App, AppError, StockHint, DEFAULT_CHART_ITEMS};
pub use snapshot::{InMemorySnapshotStore, JsonFileStore, Snapshot, SnapshotError, SnapshotStore};
