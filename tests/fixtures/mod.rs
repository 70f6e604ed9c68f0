//! Test fixtures and mock implementations for integration testing

use pug_room::config::LobbyConfig;
use pug_room::error::{PugError, Result};
use pug_room::messaging::RecordingSink;
use pug_room::metrics::MetricsCollector;
use pug_room::registry::LobbyRegistry;
use pug_room::scheduler::ManualScheduler;
use pug_room::storage::{InMemoryStore, KeyValueStore};
use pug_room::types::Player;
use pug_room::PugService;
use serde_json::Value;
use std::sync::Arc;

/// Store that refuses writes for selected keys
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    failing_keys: Vec<String>,
}

impl FailingStore {
    pub fn failing_on(keys: &[&str]) -> Self {
        Self {
            inner: InMemoryStore::new(),
            failing_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        self.inner.load(key)
    }

    fn store(&self, key: &str, value: Value) -> Result<()> {
        if self.failing_keys.iter().any(|k| k == key) {
            return Err(PugError::StorageFailed {
                key: key.to_string(),
                message: "disk full".to_string(),
            }
            .into());
        }
        self.inner.store(key, value)
    }
}

/// A service wired to in-memory collaborators
pub struct TestSystem {
    pub service: PugService,
    pub sink: Arc<RecordingSink>,
    pub scheduler: Arc<ManualScheduler>,
}

/// The identity the service uses for its aggregate statistics
pub fn service_bot() -> Player {
    Player::bot("pugbot", "PugBot")
}

pub fn create_test_system_with_store(store: Arc<dyn KeyValueStore>) -> TestSystem {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let metrics = Arc::new(MetricsCollector::new().expect("Failed to create metrics collector"));
    let registry = LobbyRegistry::load(store, service_bot(), LobbyConfig::default(), metrics.clone())
        .expect("Failed to load registry")
        .with_seed(1234);

    TestSystem {
        service: PugService::new(registry, sink.clone(), scheduler.clone(), metrics),
        sink,
        scheduler,
    }
}

pub fn create_test_system() -> TestSystem {
    create_test_system_with_store(Arc::new(InMemoryStore::new()))
}

/// Human players `p0..pn` named `player0..playern`
pub fn create_test_players(count: usize) -> Vec<Player> {
    (0..count)
        .map(|i| Player::human(format!("p{}", i), format!("player{}", i)))
        .collect()
}
