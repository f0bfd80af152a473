//! Snapshot persistence: the two collections as one opaque serialized blob.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use supplydesk_catalog::StockItem;
use supplydesk_requisitions::RequisitionRecord;

/// Full persisted state: requisition history plus stock catalog, saved and
/// loaded as one unit so there is never a partially-written pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub records: Vec<RequisitionRecord>,
    pub stock: Vec<StockItem>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence gateway for the two collections.
///
/// `load` on a store with no prior data yields an empty snapshot, not an
/// error. Implementations must round-trip every entity field losslessly.
pub trait SnapshotStore {
    fn load(&self) -> Result<Snapshot, SnapshotError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Snapshot, SnapshotError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        (**self).save(snapshot)
    }
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, SnapshotError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot file, starting empty");
            return Ok(Snapshot::default());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)?;
        debug!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            stock = snapshot.stock.len(),
            "snapshot written"
        );
        Ok(())
    }
}

/// In-memory snapshot store.
///
/// Intended for tests/dev. Share via `Arc` to observe saves across "process
/// restarts" within one test.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    state: RwLock<Snapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Snapshot, SnapshotError> {
        self.state
            .read()
            .map(|s| s.clone())
            .map_err(|_| SnapshotError::Io(std::io::Error::other("snapshot lock poisoned")))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| SnapshotError::Io(std::io::Error::other("snapshot lock poisoned")))?;
        *state = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use supplydesk_core::{RecordId, StockItemId};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            records: vec![RequisitionRecord {
                id: RecordId::new(),
                requester: "Alice".to_string(),
                department: "IT".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                item_name: "Pen".to_string(),
                item_code: "P-01".to_string(),
                quantity: 2.5,
                unit: "pcs".to_string(),
                note: "for the whiteboard".to_string(),
                timestamp: Utc::now(),
            }],
            stock: vec![StockItem {
                id: StockItemId::new(),
                name: "Pen".to_string(),
                code: "P-01".to_string(),
                quantity: 7.5,
                unit: "pcs".to_string(),
                updated_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn missing_file_loads_as_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("supplydesk.json"));

        let snapshot = store.load().unwrap();
        assert!(snapshot.records.is_empty());
        assert!(snapshot.stock.is_empty());
    }

    #[test]
    fn file_store_round_trips_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("supplydesk.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supplydesk.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(path).load().unwrap_err();
        assert!(matches!(err, SnapshotError::Serialization(_)));
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemorySnapshotStore::new();
        assert_eq!(store.load().unwrap(), Snapshot::default());

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
    }
}
