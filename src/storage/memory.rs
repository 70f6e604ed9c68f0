//! In-memory key-value store

use crate::error::{PugError, Result};
use crate::storage::KeyValueStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store, used for tests and the `memory` storage backend
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Value>>,
    store_calls: RwLock<Vec<String>>,
    failing_once: RwLock<Vec<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys written so far, in order (for testing)
    pub fn get_store_calls(&self) -> Vec<String> {
        self.store_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Make the next write of `key` fail (for testing)
    pub fn fail_next_store(&self, key: &str) {
        if let Ok(mut failing) = self.failing_once.write() {
            failing.push(key.to_string());
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| PugError::InternalError {
                message: "Failed to acquire documents read lock".to_string(),
            })?;

        Ok(documents.get(key).cloned())
    }

    fn store(&self, key: &str, value: Value) -> Result<()> {
        if let Ok(mut calls) = self.store_calls.write() {
            calls.push(key.to_string());
        }

        if let Ok(mut failing) = self.failing_once.write() {
            if let Some(pos) = failing.iter().position(|k| k == key) {
                failing.remove(pos);
                return Err(PugError::StorageFailed {
                    key: key.to_string(),
                    message: "injected failure".to_string(),
                }
                .into());
            }
        }

        let mut documents = self
            .documents
            .write()
            .map_err(|_| PugError::InternalError {
                message: "Failed to acquire documents write lock".to_string(),
            })?;

        documents.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_missing_key() {
        let store = InMemoryStore::new();
        assert!(store.load("channels").unwrap().is_none());
    }

    #[test]
    fn test_store_replaces_document() {
        let store = InMemoryStore::new();
        store.store("stats", json!({"a": 1})).unwrap();
        store.store("stats", json!({"b": 2})).unwrap();

        assert_eq!(store.load("stats").unwrap(), Some(json!({"b": 2})));
        assert_eq!(store.get_store_calls(), vec!["stats", "stats"]);
    }

    #[test]
    fn test_fail_next_store_fails_once() {
        let store = InMemoryStore::new();
        store.fail_next_store("stats");

        assert!(store.store("stats", json!({"a": 1})).is_err());
        assert!(store.load("stats").unwrap().is_none());
        store.store("stats", json!({"a": 1})).unwrap();
        assert_eq!(store.load("stats").unwrap(), Some(json!({"a": 1})));
    }
}
