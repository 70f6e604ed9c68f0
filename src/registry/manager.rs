//! Lobby registry for handling every channel's lobby
//!
//! This module provides the LobbyRegistry that maps channels to lobbies,
//! orchestrates their lifecycle, and records statistics when games complete.
//! Messages and timers are returned as [`Effect`]s for the caller to execute.

use crate::config::LobbyConfig;
use crate::draft::{JoinOutcome, LeaveOutcome, Lobby, ModConfig};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::registry::effects::Effect;
use crate::registry::stats::{average_stat, ChannelStats, StatsRecorder, StatsReport};
use crate::registry::summary::{RosterSummary, TeamsSummary};
use crate::registry::weighting::weighted_players;
use crate::storage::{load_document, store_document, ChannelsDocument, KeyValueStore, CHANNELS_KEY};
use crate::types::{ChannelId, Player, PlayerId};
use crate::utils::{current_timestamp, join_mentions, join_names};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics about registry operations
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of lobbies configured
    pub lobbies_configured: u64,
    /// Total number of lobbies removed
    pub lobbies_removed: u64,
    /// Total number of successful joins
    pub players_joined: u64,
    /// Total number of solo fills and finished drafts
    pub games_completed: u64,
    /// Total number of random captain draws
    pub captain_draws: u64,
    /// Current number of configured lobbies
    pub active_lobbies: usize,
}

/// Owner of every channel's lobby
pub struct LobbyRegistry {
    /// Lobbies by channel
    lobbies: HashMap<ChannelId, Lobby>,
    /// Backing store for the channel map
    store: Arc<dyn KeyValueStore>,
    /// Statistics persistence
    recorder: StatsRecorder,
    /// The service's own identity; keys the per-channel aggregate record
    bot: Player,
    /// Validation limits and draft timing
    limits: LobbyConfig,
    /// Source for captain draws
    rng: StdRng,
    stats: RegistryStats,
    metrics: Arc<MetricsCollector>,
}

impl LobbyRegistry {
    /// Restore lobbies from the stored channel map.
    ///
    /// Rosters are not persisted, so every restored lobby starts empty.
    /// Entries that no longer pass validation are skipped.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        bot: Player,
        limits: LobbyConfig,
        metrics: Arc<MetricsCollector>,
    ) -> Result<Self> {
        let channels: ChannelsDocument = load_document(store.as_ref(), CHANNELS_KEY)?;

        let mut lobbies = HashMap::with_capacity(channels.len());
        for (channel, stored) in channels {
            let config = match ModConfig::new(
                stored.name.clone(),
                stored.capacity,
                stored.mode.is_team(),
                &limits,
            ) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Skipping stored lobby '{}' for channel {}: {}",
                        stored.name, channel, e
                    );
                    continue;
                }
            };
            if config != stored {
                warn!(
                    "Stored lobby '{}' for channel {} had mode {}, using {}",
                    stored.name, channel, stored.mode, config.mode
                );
            }
            debug!(
                "Restoring lobby '{}' ({}, capacity {}) for channel {}",
                config.name, config.mode, config.capacity, channel
            );
            metrics.record_lobby_configured(config.mode);
            lobbies.insert(channel, Lobby::new(config));
        }
        info!("Loaded {} configured lobbies", lobbies.len());

        let stats = RegistryStats {
            active_lobbies: lobbies.len(),
            ..Default::default()
        };

        Ok(Self {
            lobbies,
            recorder: StatsRecorder::new(store.clone()),
            store,
            bot,
            limits,
            rng: StdRng::from_entropy(),
            stats,
            metrics,
        })
    }

    /// Use a deterministic captain draw
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Persist the channel map
    pub fn flush(&self) -> Result<()> {
        self.store_channels(self.channels_document())
    }

    fn channels_document(&self) -> ChannelsDocument {
        self.lobbies
            .iter()
            .map(|(channel, lobby)| (channel.clone(), lobby.config().clone()))
            .collect()
    }

    fn store_channels(&self, channels: ChannelsDocument) -> Result<()> {
        store_document(self.store.as_ref(), CHANNELS_KEY, &channels)?;
        debug!("Persisted {} channel configurations", channels.len());
        Ok(())
    }

    /// Bind a mod to `channel`, replacing any lobby already there.
    ///
    /// The channel's statistics start over. Nothing changes in memory when
    /// the channel map cannot be stored.
    pub fn configure(
        &mut self,
        channel: &ChannelId,
        name: &str,
        capacity: usize,
        teams_enabled: bool,
    ) -> Result<()> {
        let config = ModConfig::new(name, capacity, teams_enabled, &self.limits)?;
        let mode = config.mode;

        // The stored channel map must accept the new lobby before memory does
        let mut channels = self.channels_document();
        channels.insert(channel.clone(), config.clone());
        self.store_channels(channels)?;

        let lobby = Lobby::new(config);
        info!(
            "Configuring lobby {} '{}' for channel {} - capacity: {}, mode: {}",
            lobby.id(),
            name,
            channel,
            capacity,
            mode
        );

        if let Some(previous) = self.lobbies.insert(channel.clone(), lobby) {
            info!(
                "Replaced lobby {} '{}' in channel {}",
                previous.id(),
                previous.name(),
                channel
            );
            self.metrics.record_lobby_removed(previous.mode());
        } else {
            self.stats.active_lobbies += 1;
        }
        self.stats.lobbies_configured += 1;
        self.metrics.record_lobby_configured(mode);

        self.recorder.reset_channel(channel)
    }

    /// Drop the channel's lobby and its statistics; returns whether one existed
    pub fn remove(&mut self, channel: &ChannelId) -> Result<bool> {
        let Some(lobby) = self.lobbies.remove(channel) else {
            return Ok(false);
        };

        info!(
            "Removed lobby {} '{}' from channel {}",
            lobby.id(),
            lobby.name(),
            channel
        );
        self.stats.lobbies_removed += 1;
        self.stats.active_lobbies = self.stats.active_lobbies.saturating_sub(1);
        self.metrics.record_lobby_removed(lobby.mode());

        self.flush()?;
        self.recorder.remove_channel(channel)?;
        Ok(true)
    }

    /// Add `player` to the channel's lobby.
    ///
    /// Filling a team lobby schedules a captain draw; filling a solo lobby
    /// records the game and clears the lobby.
    pub fn join(&mut self, channel: &ChannelId, player: &Player) -> Result<Vec<Effect>> {
        if player.is_bot {
            debug!("Ignoring join from bot account {}", player.id);
            return Ok(Vec::new());
        }
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Ok(Vec::new());
        };

        let start_time = Instant::now();
        let outcome = lobby.add_player(player.clone());
        if !outcome.is_success() {
            debug!(
                "Player '{}' could not join lobby {} ({}/{})",
                player.id,
                lobby.id(),
                lobby.player_count(),
                lobby.capacity()
            );
            return Ok(Vec::new());
        }

        info!(
            "Player '{}' joined lobby {} '{}' - {}/{}",
            player.id,
            lobby.id(),
            lobby.name(),
            lobby.player_count(),
            lobby.capacity()
        );
        self.stats.players_joined += 1;
        self.metrics.record_player_joined(lobby.mode());

        let mut effects = vec![Effect::direct_message(
            player,
            format!("You have joined {}", lobby.name()),
        )];

        if outcome != JoinOutcome::Joined {
            let players: Vec<Player> = lobby.roster().iter().flatten().cloned().collect();
            effects.push(Effect::channel_message(
                channel,
                format!("{}\n{} has been filled", join_mentions(&players), lobby.name()),
            ));

            match outcome {
                JoinOutcome::FilledAwaitingCaptains => {
                    info!("Lobby {} is full, awaiting captains", lobby.id());
                    effects.push(Effect::ScheduleCaptainDraw {
                        channel: channel.clone(),
                        delay: self.limits.captain_draw_delay(),
                    });
                }
                _ => {
                    info!("Lobby {} is full, recording solo game", lobby.id());
                    let write_start = Instant::now();
                    let recorded = self.recorder.record_fill(
                        channel,
                        &players,
                        &self.bot.id,
                        join_names(&players),
                        current_timestamp(),
                    );
                    self.metrics
                        .record_stats_write(recorded.is_ok(), write_start.elapsed());
                    recorded?;

                    lobby.full_reset();
                    self.stats.games_completed += 1;
                    self.metrics.record_game_completed(lobby.mode());
                }
            }
        }

        self.metrics
            .record_lobby_operation("join", start_time.elapsed());
        Ok(effects)
    }

    /// Remove `player` from the channel's lobby
    pub fn leave(&mut self, channel: &ChannelId, player: &Player) -> Vec<Effect> {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Vec::new();
        };

        match lobby.remove_player(player) {
            LeaveOutcome::NotPresent => Vec::new(),
            LeaveOutcome::Left => {
                info!("Player '{}' left lobby {}", player.id, lobby.id());
                self.metrics.record_player_left(lobby.mode());
                Vec::new()
            }
            LeaveOutcome::LeftAndReset => {
                info!(
                    "Player '{}' left full lobby {}, draft reset",
                    player.id,
                    lobby.id()
                );
                self.metrics.record_player_left(lobby.mode());
                self.metrics.record_reset("soft");
                vec![Effect::channel_message(
                    channel,
                    format!("{} has been reset", lobby.name()),
                )]
            }
        }
    }

    /// Remove `player` from every lobby, e.g. when they go offline
    pub fn leave_everywhere(&mut self, player: &Player) -> Vec<Effect> {
        let mut channels: Vec<ChannelId> = self.lobbies.keys().cloned().collect();
        channels.sort();

        channels
            .iter()
            .flat_map(|channel| self.leave(channel, player))
            .collect()
    }

    /// Make `player` the next captain of the channel's lobby
    pub fn set_captain(&mut self, channel: &ChannelId, player: &Player) -> Vec<Effect> {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Vec::new();
        };
        let Some(team) = lobby.set_captain(player) else {
            return Vec::new();
        };

        info!(
            "Player '{}' is captain for {} in lobby {}",
            player.id,
            team,
            lobby.id()
        );
        match lobby.current_captain() {
            Some(captain) if lobby.has_captains() => vec![Effect::channel_message(
                channel,
                format!("{} to pick", captain.mention),
            )],
            _ => Vec::new(),
        }
    }

    /// Draft roster slot `index` (zero-based) for `captain`'s team.
    ///
    /// Completing the draft announces the teams, records statistics and
    /// clears the lobby. A lobby whose teams are already complete, because
    /// recording failed earlier, retries the recording instead of picking.
    pub fn pick(&mut self, channel: &ChannelId, captain: &Player, index: usize) -> Result<Vec<Effect>> {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Ok(Vec::new());
        };

        let start_time = Instant::now();
        if lobby.teams_ready() {
            info!(
                "Teams in lobby {} are already complete, retrying completion",
                lobby.id()
            );
        } else {
            let undrafted_before = lobby.undrafted().count();
            let Some(team) = lobby.pick_player(captain, index) else {
                debug!(
                    "Pick of slot {} by '{}' rejected in lobby {}",
                    index,
                    captain.id,
                    lobby.id()
                );
                return Ok(Vec::new());
            };

            let auto_assigned = undrafted_before - 1 - lobby.undrafted().count();
            info!(
                "Captain '{}' picked slot {} for {} in lobby {} (auto-assigned: {})",
                captain.id,
                index,
                team,
                lobby.id(),
                auto_assigned
            );
            self.metrics.record_pick(auto_assigned);

            if !lobby.teams_ready() {
                let effects = lobby
                    .current_captain()
                    .map(|next| {
                        vec![Effect::channel_message(
                            channel,
                            format!("{} to pick", next.mention),
                        )]
                    })
                    .unwrap_or_default();
                self.metrics
                    .record_lobby_operation("pick", start_time.elapsed());
                return Ok(effects);
            }
        }

        info!("Draft complete in lobby {}", lobby.id());
        let announcement = format!(
            "Red Team: {}\nBlue Team: {}",
            join_mentions(lobby.red_team()),
            join_mentions(lobby.blue_team())
        );

        let write_start = Instant::now();
        let recorded = self.recorder.record_draft(
            channel,
            &weighted_players(lobby),
            &self.bot.id,
            TeamsSummary::from_lobby(lobby).single_line(),
            current_timestamp(),
        );
        self.metrics
            .record_stats_write(recorded.is_ok(), write_start.elapsed());
        recorded?;

        lobby.full_reset();
        self.stats.games_completed += 1;
        self.metrics.record_game_completed(lobby.mode());
        self.metrics
            .record_lobby_operation("pick", start_time.elapsed());

        Ok(vec![Effect::channel_message(channel, announcement)])
    }

    /// Send drafted players back to the roster and redraw captains.
    ///
    /// Only full team lobbies can be reset this way.
    pub fn reset(&mut self, channel: &ChannelId) -> Vec<Effect> {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Vec::new();
        };
        if !lobby.is_full() || !lobby.is_team_game() {
            return Vec::new();
        }

        lobby.reset();
        info!("Lobby {} reset, redrawing captains", lobby.id());
        self.metrics.record_reset("soft");

        vec![
            Effect::channel_message(channel, format!("{} has been reset", lobby.name())),
            Effect::ScheduleCaptainDraw {
                channel: channel.clone(),
                delay: self.limits.captain_draw_delay(),
            },
        ]
    }

    /// Remove everyone from the channel's lobby; returns whether it exists
    pub fn full_reset(&mut self, channel: &ChannelId) -> bool {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return false;
        };

        lobby.full_reset();
        info!("Lobby {} emptied", lobby.id());
        self.metrics.record_reset("full");
        true
    }

    /// Pick missing captains at random from the undrafted players
    pub fn draw_random_captains(&mut self, channel: &ChannelId) -> Vec<Effect> {
        let Some(lobby) = self.lobbies.get_mut(channel) else {
            return Vec::new();
        };
        if !lobby.is_full() || !lobby.is_team_game() || lobby.has_captains() {
            debug!("Skipping captain draw for lobby {}", lobby.id());
            return Vec::new();
        }

        let mut candidates: Vec<usize> = lobby.undrafted().map(|(i, _)| i).collect();
        candidates.shuffle(&mut self.rng);

        let needed = if lobby.red_team().is_empty() { 2 } else { 1 };
        if candidates.len() < needed {
            warn!(
                "Lobby {} needs {} captain(s) but only {} candidate(s) remain",
                lobby.id(),
                needed,
                candidates.len()
            );
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(needed + 1);
        for &index in candidates.iter().take(needed) {
            if let Some(team) = lobby.set_captain_at(index) {
                if let Some(captain) = lobby.captain(team) {
                    lines.push(format!("{} is captain for {}", captain.name, team));
                }
            }
        }
        if let Some(captain) = lobby.current_captain() {
            lines.push(format!("{} to pick", captain.mention));
        }

        info!("Captains drawn for lobby {}", lobby.id());
        self.stats.captain_draws += 1;
        self.metrics.record_captain_draw();

        vec![Effect::channel_message(channel, lines.join("\n"))]
    }

    /// Announce how many players the channel's lobby still needs
    pub fn promote(&self, channel: &ChannelId) -> Vec<Effect> {
        let Some(lobby) = self.lobbies.get(channel) else {
            return Vec::new();
        };

        let needed = lobby.capacity() - lobby.roster().len();
        vec![Effect::channel_message(
            channel,
            format!("@here Only {} more needed for {}", needed, lobby.name()),
        )]
    }

    pub fn roster_summary(&self, channel: &ChannelId) -> Option<RosterSummary> {
        self.lobbies.get(channel).map(RosterSummary::from_lobby)
    }

    /// Teams of a full team lobby
    pub fn teams_summary(&self, channel: &ChannelId) -> Option<TeamsSummary> {
        self.lobbies
            .get(channel)
            .filter(|lobby| lobby.is_team_game() && lobby.is_full())
            .map(TeamsSummary::from_lobby)
    }

    /// Captain whose turn it is to pick
    pub fn whose_turn(&self, channel: &ChannelId) -> Option<&Player> {
        self.lobbies
            .get(channel)
            .filter(|lobby| lobby.is_team_game() && lobby.is_full())
            .and_then(Lobby::current_captain)
    }

    /// Statistics for one player in a configured channel
    pub fn player_stats(&self, channel: &ChannelId, player: &PlayerId) -> Result<Option<StatsReport>> {
        let Some(lobby) = self.lobbies.get(channel) else {
            return Ok(None);
        };
        let Some(stats) = self.recorder.player_stats(channel, player)? else {
            return Ok(None);
        };

        let average = (lobby.is_team_game() && *player != self.bot.id)
            .then(|| average_stat(&stats, lobby.config().max_picks()));
        Ok(Some(StatsReport { stats, average }))
    }

    /// The channel's aggregate record
    pub fn channel_stats(&self, channel: &ChannelId) -> Result<Option<StatsReport>> {
        self.player_stats(channel, &self.bot.id)
    }

    /// Every stored record for a channel
    pub fn all_stats(&self, channel: &ChannelId) -> Result<ChannelStats> {
        self.recorder.channel_stats(channel)
    }

    pub fn lobby(&self, channel: &ChannelId) -> Option<&Lobby> {
        self.lobbies.get(channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelId> {
        self.lobbies.keys()
    }

    pub fn bot(&self) -> &Player {
        &self.bot
    }

    pub fn limits(&self) -> &LobbyConfig {
        &self.limits
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}
