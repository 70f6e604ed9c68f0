//! Key-value persistence for lobby configuration and statistics
//!
//! The service stores a small fixed set of whole documents (`"channels"` and
//! `"stats"`). Every write replaces the full document; callers that touch one
//! channel load the document, merge their change, and store it back.

pub mod documents;
pub mod file;
pub mod memory;

use crate::error::Result;
use serde_json::Value;

pub use documents::{
    load_document, store_document, ChannelsDocument, StatsDocument, CHANNELS_KEY, STATS_KEY,
};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

/// Trait for whole-document key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Load the document stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the document stored under `key`
    fn store(&self, key: &str, value: Value) -> Result<()>;
}
