//! Persistence bridge: the live canvas mirrored to durable storage under one key.
//!
//! The stored value is a small JSON record wrapping a PNG data URL. Anything
//! that fails to read back (missing key, storage error, bad JSON, bad image)
//! is treated as "no saved state".

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::snapshot::Snapshot;
use crate::storage::Storage;

/// Schema version of the persisted record.
pub const PERSIST_SCHEMA_VERSION: &str = "1.0";

/// What actually sits in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCanvasV1 {
    pub schema_version: String,
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

impl PersistedCanvasV1 {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            schema_version: PERSIST_SCHEMA_VERSION.to_string(),
            width: snapshot.width(),
            height: snapshot.height(),
            data_url: snapshot.to_data_url(),
        }
    }
}

pub struct PersistenceBridge {
    storage: Box<dyn Storage>,
    key: String,
}

impl PersistenceBridge {
    pub fn new(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the stored canvas with `snapshot`.
    pub fn persist(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let record = PersistedCanvasV1::from_snapshot(snapshot);
        let json = serde_json::to_string(&record).context("serialize persisted canvas")?;
        self.storage
            .set(&self.key, &json)
            .with_context(|| format!("persist canvas under key {:?}", self.key))?;
        debug!(key = %self.key, width = record.width, height = record.height, "canvas persisted");
        Ok(())
    }

    /// Read the stored canvas back, if there is a usable one.
    pub fn restore(&self) -> Option<Snapshot> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no saved canvas");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %format!("{e:#}"), "storage unavailable, starting blank");
                return None;
            }
        };

        let record: PersistedCanvasV1 = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, error = %e, "saved canvas is not valid json, ignoring it");
                return None;
            }
        };

        match Snapshot::from_data_url(&record.data_url) {
            Ok(snapshot) => {
                info!(
                    width = snapshot.width(),
                    height = snapshot.height(),
                    "restored saved canvas"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "saved canvas image is corrupt, ignoring it");
                None
            }
        }
    }

    pub fn has_saved(&self) -> bool {
        matches!(self.storage.get(&self.key), Ok(Some(_)))
    }

    /// Drop the stored canvas.
    pub fn forget(&mut self) -> anyhow::Result<()> {
        self.storage
            .remove(&self.key)
            .with_context(|| format!("remove canvas under key {:?}", self.key))
    }
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Snapshot {
        let rgba: Vec<u8> = (0..width * height).flat_map(|_| px).collect();
        Snapshot::encode(width, height, &rgba).unwrap()
    }

    #[test]
    fn persist_then_restore() {
        let mut bridge = PersistenceBridge::new(Box::new(MemoryStorage::new()), "canvas_data");
        assert!(bridge.restore().is_none());

        let snap = solid(4, 3, [1, 2, 3, 255]);
        bridge.persist(&snap).unwrap();

        assert!(bridge.has_saved());
        assert_eq!(bridge.restore(), Some(snap));
    }

    #[test]
    fn corrupt_record_counts_as_missing() {
        let mut storage = MemoryStorage::new();
        storage.set("canvas_data", "{ not json").unwrap();
        let bridge = PersistenceBridge::new(Box::new(storage), "canvas_data");
        assert!(bridge.restore().is_none());

        let mut storage = MemoryStorage::new();
        let record = PersistedCanvasV1 {
            schema_version: PERSIST_SCHEMA_VERSION.into(),
            width: 1,
            height: 1,
            data_url: "data:image/png;base64,AAAA".into(),
        };
        storage
            .set("canvas_data", &serde_json::to_string(&record).unwrap())
            .unwrap();
        let bridge = PersistenceBridge::new(Box::new(storage), "canvas_data");
        assert!(bridge.restore().is_none());
    }

    #[test]
    fn forget_removes() {
        let mut bridge = PersistenceBridge::new(Box::new(MemoryStorage::new()), "k");
        bridge.persist(&solid(1, 1, [0, 0, 0, 255])).unwrap();
        bridge.forget().unwrap();
        assert!(!bridge.has_saved());
    }
}
