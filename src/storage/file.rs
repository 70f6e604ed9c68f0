//! JSON file key-value store
//!
//! All keys live in one JSON object on disk. A write serializes the whole
//! object to a sibling temp file and renames it over the original, so a
//! failed write leaves the previous contents untouched.

use crate::error::{PugError, Result};
use crate::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self, key: &str) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| PugError::StorageFailed {
            key: key.to_string(),
            message: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            PugError::Serialization {
                key: key.to_string(),
                message: format!("corrupt store file {}: {}", self.path.display(), e),
            }
            .into()
        })
    }

    fn write_all(&self, key: &str, documents: &Map<String, Value>) -> Result<()> {
        let storage_error = |e: std::io::Error| PugError::StorageFailed {
            key: key.to_string(),
            message: format!("failed to write {}: {}", self.path.display(), e),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let bytes = serde_json::to_vec_pretty(documents).map_err(|e| PugError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, bytes).map_err(storage_error)?;
        std::fs::rename(&tmp_path, &self.path).map_err(storage_error)?;

        debug!("Stored '{}' in {}", key, self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.write_lock.lock().map_err(|_| PugError::InternalError {
            message: "Failed to acquire store lock".to_string(),
        })?;

        Ok(self.read_all(key)?.remove(key))
    }

    fn store(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| PugError::InternalError {
            message: "Failed to acquire store lock".to_string(),
        })?;

        let mut documents = self.read_all(key)?;
        documents.insert(key.to_string(), value);
        self.write_all(key, &documents)
    }
}
