//! Typed access to stored documents

use crate::draft::ModConfig;
use crate::error::{PugError, Result};
use crate::registry::stats::ChannelStats;
use crate::storage::KeyValueStore;
use crate::types::ChannelId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Key of the channel → mod configuration map
pub const CHANNELS_KEY: &str = "channels";

/// Key of the channel → player statistics map
pub const STATS_KEY: &str = "stats";

/// Persisted lobby configuration per channel
pub type ChannelsDocument = BTreeMap<ChannelId, ModConfig>;

/// Persisted statistics per channel
pub type StatsDocument = BTreeMap<ChannelId, ChannelStats>;

/// Load and deserialize a document, defaulting when it was never stored
pub fn load_document<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.load(key)? {
        Some(value) => serde_json::from_value(value).map_err(|e| {
            PugError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into()
        }),
        None => Ok(T::default()),
    }
}

/// Serialize and store a whole document
pub fn store_document<T>(store: &dyn KeyValueStore, key: &str, document: &T) -> Result<()>
where
    T: Serialize,
{
    let value = serde_json::to_value(document).map_err(|e| PugError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.store(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LobbyConfig;
    use crate::storage::InMemoryStore;
    use serde_json::json;

    #[test]
    fn test_missing_document_defaults() {
        let store = InMemoryStore::new();
        let channels: ChannelsDocument = load_document(&store, CHANNELS_KEY).unwrap();
        assert!(channels.is_empty());
    }

    #[test]
    fn test_channels_document_round_trip() {
        let store = InMemoryStore::new();
        let mut channels = ChannelsDocument::new();
        channels.insert(
            "general".to_string(),
            ModConfig::new("ctf", 8, true, &LobbyConfig::default()).unwrap(),
        );

        store_document(&store, CHANNELS_KEY, &channels).unwrap();
        let loaded: ChannelsDocument = load_document(&store, CHANNELS_KEY).unwrap();
        assert_eq!(loaded, channels);
    }

    #[test]
    fn test_malformed_document() {
        let store = InMemoryStore::new();
        store.store(STATS_KEY, json!(["not", "a", "map"])).unwrap();

        let err = load_document::<StatsDocument>(&store, STATS_KEY).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PugError>(),
            Some(PugError::Serialization { .. })
        ));
    }
}
