//! Service façade over the lobby registry
//!
//! PugService serializes every registry call behind one async mutex and then
//! carries out the returned effects: chat messages go to the message sink,
//! captain draws go to the scheduler. Effects run after the lock is released.

use crate::config::{AppConfig, StorageBackend, StorageSettings};
use crate::error::Result;
use crate::messaging::MessageSink;
use crate::metrics::MetricsCollector;
use crate::registry::{Effect, LobbyRegistry, RegistryStats, RosterSummary, StatsReport, TeamsSummary};
use crate::scheduler::{DelayScheduler, ScheduledTask};
use crate::storage::{InMemoryStore, JsonFileStore, KeyValueStore};
use crate::types::{ChannelId, Player, PlayerId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Async entry point for the command layer
#[derive(Clone)]
pub struct PugService {
    registry: Arc<Mutex<LobbyRegistry>>,
    sink: Arc<dyn MessageSink>,
    scheduler: Arc<dyn DelayScheduler>,
    metrics: Arc<MetricsCollector>,
}

/// Build the store selected by the storage settings
pub fn open_store(settings: &StorageSettings) -> Arc<dyn KeyValueStore> {
    match settings.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Arc::new(InMemoryStore::new())
        }
        StorageBackend::File => {
            info!("Using file storage at {}", settings.path.display());
            Arc::new(JsonFileStore::new(&settings.path))
        }
    }
}

/// Deferred `draw_random_captains` call for `channel`
fn captain_draw_task(service: PugService, channel: ChannelId) -> ScheduledTask {
    Box::pin(async move {
        service.draw_random_captains(&channel).await;
    })
}

impl PugService {
    /// Wrap an already loaded registry
    pub fn new(
        registry: LobbyRegistry,
        sink: Arc<dyn MessageSink>,
        scheduler: Arc<dyn DelayScheduler>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            sink,
            scheduler,
            metrics,
        }
    }

    /// Open storage, create metrics and restore lobbies from configuration.
    ///
    /// `bot` is the service's own chat identity.
    pub fn from_config(
        config: &AppConfig,
        bot: Player,
        sink: Arc<dyn MessageSink>,
        scheduler: Arc<dyn DelayScheduler>,
    ) -> Result<Self> {
        info!("Starting {} service", config.service.name);

        let store = open_store(&config.storage);
        let metrics = Arc::new(MetricsCollector::new()?);
        let registry = LobbyRegistry::load(store, bot, config.lobby.clone(), metrics.clone())?;

        Ok(Self::new(registry, sink, scheduler, metrics))
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Direct access to the registry, e.g. for seeding draws in tests
    pub fn registry(&self) -> Arc<Mutex<LobbyRegistry>> {
        self.registry.clone()
    }

    async fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ChannelMessage { channel, text } => {
                    if let Err(e) = self.sink.send_channel_message(&channel, &text).await {
                        error!("Failed to send message to channel {}: {}", channel, e);
                    }
                }
                Effect::DirectMessage { player, text } => {
                    if let Err(e) = self.sink.send_direct_message(&player, &text).await {
                        error!("Failed to send direct message to '{}': {}", player.id, e);
                    }
                }
                Effect::ScheduleCaptainDraw { channel, delay } => {
                    debug!("Captain draw for channel {} in {:?}", channel, delay);
                    self.scheduler
                        .after(delay, captain_draw_task(self.clone(), channel));
                }
            }
        }
    }

    pub async fn configure(
        &self,
        channel: &ChannelId,
        name: &str,
        capacity: usize,
        teams_enabled: bool,
    ) -> Result<()> {
        let mut registry = self.registry.lock().await;
        registry.configure(channel, name, capacity, teams_enabled)
    }

    pub async fn remove(&self, channel: &ChannelId) -> Result<bool> {
        let mut registry = self.registry.lock().await;
        registry.remove(channel)
    }

    pub async fn join(&self, channel: &ChannelId, player: &Player) -> Result<()> {
        let effects = {
            let mut registry = self.registry.lock().await;
            registry.join(channel, player)?
        };
        self.dispatch(effects).await;
        Ok(())
    }

    pub async fn leave(&self, channel: &ChannelId, player: &Player) {
        let effects = self.registry.lock().await.leave(channel, player);
        self.dispatch(effects).await;
    }

    /// Remove a player who went offline from every lobby
    pub async fn leave_everywhere(&self, player: &Player) {
        let effects = self.registry.lock().await.leave_everywhere(player);
        self.dispatch(effects).await;
    }

    pub async fn set_captain(&self, channel: &ChannelId, player: &Player) {
        let effects = self.registry.lock().await.set_captain(channel, player);
        self.dispatch(effects).await;
    }

    /// Draft the player shown at 1-based `slot` in the roster summary
    pub async fn pick(&self, channel: &ChannelId, captain: &Player, slot: usize) -> Result<()> {
        let Some(index) = slot.checked_sub(1) else {
            debug!("Ignoring pick of slot 0 by '{}'", captain.id);
            return Ok(());
        };

        let effects = {
            let mut registry = self.registry.lock().await;
            registry.pick(channel, captain, index)?
        };
        self.dispatch(effects).await;
        Ok(())
    }

    pub async fn reset(&self, channel: &ChannelId) {
        let effects = self.registry.lock().await.reset(channel);
        self.dispatch(effects).await;
    }

    pub async fn full_reset(&self, channel: &ChannelId) -> bool {
        self.registry.lock().await.full_reset(channel)
    }

    pub async fn draw_random_captains(&self, channel: &ChannelId) {
        let effects = self.registry.lock().await.draw_random_captains(channel);
        self.dispatch(effects).await;
    }

    pub async fn promote(&self, channel: &ChannelId) {
        let effects = self.registry.lock().await.promote(channel);
        self.dispatch(effects).await;
    }

    pub async fn roster_summary(&self, channel: &ChannelId) -> Option<RosterSummary> {
        self.registry.lock().await.roster_summary(channel)
    }

    pub async fn teams_summary(&self, channel: &ChannelId) -> Option<TeamsSummary> {
        self.registry.lock().await.teams_summary(channel)
    }

    pub async fn whose_turn(&self, channel: &ChannelId) -> Option<Player> {
        self.registry.lock().await.whose_turn(channel).cloned()
    }

    pub async fn player_stats(
        &self,
        channel: &ChannelId,
        player: &PlayerId,
    ) -> Result<Option<StatsReport>> {
        self.registry.lock().await.player_stats(channel, player)
    }

    pub async fn channel_stats(&self, channel: &ChannelId) -> Result<Option<StatsReport>> {
        self.registry.lock().await.channel_stats(channel)
    }

    pub async fn registry_stats(&self) -> RegistryStats {
        self.registry.lock().await.stats().clone()
    }

    /// Persist the channel map before exiting
    pub async fn shutdown(&self) -> Result<()> {
        let registry = self.registry.lock().await;
        let stats = registry.stats();
        info!(
            "Shutting down - active_lobbies: {}, players_joined: {}, games_completed: {}, captain_draws: {}",
            stats.active_lobbies, stats.players_joined, stats.games_completed, stats.captain_draws
        );
        registry.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LobbyConfig;
    use crate::messaging::RecordingSink;
    use crate::scheduler::ManualScheduler;
    use std::time::Duration;

    struct Harness {
        service: PugService,
        sink: Arc<RecordingSink>,
        scheduler: Arc<ManualScheduler>,
    }

    fn create_test_service() -> Harness {
        let sink = Arc::new(RecordingSink::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let registry = LobbyRegistry::load(
            Arc::new(InMemoryStore::new()),
            Player::bot("bot", "pugbot"),
            LobbyConfig::default(),
            metrics.clone(),
        )
        .unwrap()
        .with_seed(42);

        Harness {
            service: PugService::new(registry, sink.clone(), scheduler.clone(), metrics),
            sink,
            scheduler,
        }
    }

    fn channel() -> ChannelId {
        "general".to_string()
    }

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::human(format!("p{}", i), format!("player{}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_join_dispatches_messages() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 4, true).await.unwrap();
        let p = players(1);

        h.service.join(&channel(), &p[0]).await.unwrap();
        assert_eq!(h.sink.direct_messages("p0"), vec!["You have joined ctf"]);
        assert!(h.sink.channel_messages("general").is_empty());
    }

    #[tokio::test]
    async fn test_fill_schedules_and_runs_draw() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 4, true).await.unwrap();
        for player in players(4) {
            h.service.join(&channel(), &player).await.unwrap();
        }

        assert_eq!(h.scheduler.pending_delays(), vec![Duration::from_secs(10)]);
        assert!(h.service.whose_turn(&channel()).await.is_none());

        assert_eq!(h.scheduler.run_pending().await, 1);
        let captain = h.service.whose_turn(&channel()).await.unwrap();
        let messages = h.sink.channel_messages("general");
        assert!(messages
            .last()
            .unwrap()
            .ends_with(&format!("{} to pick", captain.mention)));
    }

    #[tokio::test]
    async fn test_stale_draw_after_leave_is_noop() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 4, true).await.unwrap();
        let p = players(4);
        for player in &p {
            h.service.join(&channel(), player).await.unwrap();
        }

        h.service.leave(&channel(), &p[3]).await;
        h.sink.clear();
        h.scheduler.run_pending().await;

        assert!(h.sink.sent().is_empty());
        assert!(h.service.whose_turn(&channel()).await.is_none());
    }

    #[tokio::test]
    async fn test_pick_uses_one_based_slots() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 4, true).await.unwrap();
        let p = players(4);
        for player in &p {
            h.service.join(&channel(), player).await.unwrap();
        }
        h.service.set_captain(&channel(), &p[0]).await;
        h.service.set_captain(&channel(), &p[1]).await;

        // Slot 0 does not exist
        h.service.pick(&channel(), &p[0], 0).await.unwrap();
        assert_eq!(
            h.service.roster_summary(&channel()).await.unwrap().slots.len(),
            2
        );

        h.service.pick(&channel(), &p[0], 3).await.unwrap();
        let last = h.sink.channel_messages("general").pop().unwrap();
        assert_eq!(
            last,
            format!(
                "Red Team: {} {}\nBlue Team: {} {}",
                p[0].mention, p[2].mention, p[1].mention, p[3].mention
            )
        );

        let stats = h.service.channel_stats(&channel()).await.unwrap().unwrap();
        assert_eq!(stats.stats.total_games, 1);
        assert_eq!(h.service.registry_stats().await.games_completed, 1);
    }

    #[tokio::test]
    async fn test_reset_schedules_redraw() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 4, true).await.unwrap();
        for player in players(4) {
            h.service.join(&channel(), &player).await.unwrap();
        }
        h.scheduler.run_pending().await;

        h.service.reset(&channel()).await;
        assert_eq!(h.scheduler.pending(), 1);
        assert!(h
            .sink
            .channel_messages("general")
            .contains(&"ctf has been reset".to_string()));

        h.scheduler.run_pending().await;
        assert!(h.service.whose_turn(&channel()).await.is_some());
    }

    #[tokio::test]
    async fn test_promote_and_shutdown() {
        let h = create_test_service();
        h.service.configure(&channel(), "ctf", 6, true).await.unwrap();
        h.service.join(&channel(), &players(1)[0]).await.unwrap();

        h.service.promote(&channel()).await;
        assert_eq!(
            h.sink.channel_messages("general"),
            vec!["@here Only 5 more needed for ctf"]
        );
        h.service.shutdown().await.unwrap();
    }
}
