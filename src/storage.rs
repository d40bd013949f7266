//! Key → JSON blob persistence.
//!
//! The original client kept everything in browser localStorage under two
//! keys (the event collection and the transport settings). This module keeps
//! that contract: a [`BlobStore`] is a flat key-value map of JSON documents,
//! with a file-backed implementation for the binary and an in-memory one for
//! tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat key-value blob store. `get` returns `None` for absent keys; `set`
/// replaces the whole document for a key.
pub trait BlobStore: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;
}

// ============================================================================
// File-backed store
// ============================================================================

/// One pretty-printed `<key>.json` file per key under a data directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let data = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring unreadable blob {}: {e}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        atomic_write_str(&self.path_for(key), &json)?;
        Ok(())
    }
}

/// Write via a sibling temp file + rename so readers never observe a
/// half-written document.
fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

// ============================================================================
// In-memory store
// ============================================================================

/// Ephemeral store for tests and sessions without a data directory.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.blobs
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if let Ok(mut map) = self.blobs.lock() {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());
        store.set("k", &json!({"a": 1})).unwrap();
        assert_eq!(store.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.set("schedule_events", &json!([{"id": "evt_1"}])).unwrap();

        // A fresh handle over the same directory sees the blob.
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("schedule_events"),
            Some(json!([{"id": "evt_1"}]))
        );
    }

    #[test]
    fn file_store_ignores_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.get("bad").is_none());
    }
}
