//! Per-channel player statistics
//!
//! Statistics live in the `"stats"` document as channel → player id →
//! [`PlayerStats`]. Every update loads the document, changes only the owning
//! channel's sub-record and stores the whole document again.

use crate::error::Result;
use crate::storage::{load_document, store_document, KeyValueStore, StatsDocument, STATS_KEY};
use crate::types::{ChannelId, Player, PlayerId};
use crate::utils::{current_timestamp, humanize_since};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Statistics record for one player (or the channel aggregate) in one channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Completed fills/drafts the player took part in
    pub total_games: u32,
    /// Drafts where the player was a captain
    pub captain_count: u32,
    /// Sum of pick positions when drafted by a captain
    pub total_pick_weight: u32,
    pub last_played_at: Option<DateTime<Utc>>,
    /// Membership of the last completed game, aggregate record only
    pub last_roster_summary: Option<String>,
}

/// Statistics for every player of one channel
pub type ChannelStats = BTreeMap<PlayerId, PlayerStats>;

impl PlayerStats {
    fn record_game(&mut self, at: DateTime<Utc>) {
        self.total_games += 1;
        self.last_played_at = Some(at);
    }

    /// Record a drafted game where the player got pick position `weight`
    fn record_pick(&mut self, weight: u32, at: DateTime<Utc>) {
        self.record_game(at);
        if weight == 0 {
            self.captain_count += 1;
        } else {
            self.total_pick_weight += weight;
        }
    }

    /// Mean pick position over the games the player was picked rather than
    /// captaining. Zero when there are no such games.
    pub fn average_pick(&self) -> f64 {
        let picked_games = i64::from(self.total_games) - i64::from(self.captain_count);
        if picked_games <= 0 {
            0.0
        } else {
            f64::from(self.total_pick_weight) / picked_games as f64
        }
    }
}

/// Average pick position reported against the number of picks in a draft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragePick {
    pub average: f64,
    pub max_picks: usize,
}

impl std::fmt::Display for AveragePick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/{}", self.average, self.max_picks)
    }
}

pub fn average_stat(record: &PlayerStats, max_picks: usize) -> AveragePick {
    AveragePick {
        average: record.average_pick(),
        max_picks,
    }
}

/// Statistics prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub stats: PlayerStats,
    /// Present for team lobbies
    pub average: Option<AveragePick>,
}

impl StatsReport {
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let mut out = format!("Total [{}]", self.stats.total_games);
        if let Some(average) = &self.average {
            out.push_str(&format!(
                " Captain [{}] Avg. [{}]",
                self.stats.captain_count, average
            ));
        }
        if let Some(last) = self.stats.last_played_at {
            out.push_str(&format!(" Last [{}]", humanize_since(last, now)));
        }
        if let Some(summary) = &self.stats.last_roster_summary {
            out.push(' ');
            out.push_str(summary);
        }
        out
    }
}

impl std::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(current_timestamp()))
    }
}

/// Reads and updates the persisted statistics document
#[derive(Clone)]
pub struct StatsRecorder {
    store: Arc<dyn KeyValueStore>,
}

impl StatsRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn update_channel<F>(&self, channel: &ChannelId, update: F) -> Result<()>
    where
        F: FnOnce(&mut ChannelStats),
    {
        let mut document: StatsDocument = load_document(self.store.as_ref(), STATS_KEY)?;
        update(document.entry(channel.clone()).or_default());
        store_document(self.store.as_ref(), STATS_KEY, &document)
    }

    /// Start a fresh, empty bucket for `channel`
    pub fn reset_channel(&self, channel: &ChannelId) -> Result<()> {
        debug!("Resetting statistics for channel {}", channel);
        self.update_channel(channel, |stats| stats.clear())
    }

    /// Drop the bucket for `channel`; returns whether one existed
    pub fn remove_channel(&self, channel: &ChannelId) -> Result<bool> {
        let mut document: StatsDocument = load_document(self.store.as_ref(), STATS_KEY)?;
        let removed = document.remove(channel).is_some();
        store_document(self.store.as_ref(), STATS_KEY, &document)?;
        Ok(removed)
    }

    /// Record a solo lobby that filled up
    pub fn record_fill(
        &self,
        channel: &ChannelId,
        players: &[Player],
        aggregate: &PlayerId,
        summary: String,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.update_channel(channel, |stats| {
            for player in players {
                stats.entry(player.id.clone()).or_default().record_game(at);
            }
            let lobby = stats.entry(aggregate.clone()).or_default();
            lobby.record_game(at);
            lobby.last_roster_summary = Some(summary);
        })
    }

    /// Record a completed draft; `drafted` pairs each player with their pick
    /// position (0 for captains).
    pub fn record_draft(
        &self,
        channel: &ChannelId,
        drafted: &[(&Player, u32)],
        aggregate: &PlayerId,
        summary: String,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.update_channel(channel, |stats| {
            for (player, weight) in drafted {
                stats
                    .entry(player.id.clone())
                    .or_default()
                    .record_pick(*weight, at);
            }
            let lobby = stats.entry(aggregate.clone()).or_default();
            lobby.record_game(at);
            lobby.last_roster_summary = Some(summary);
        })
    }

    pub fn channel_stats(&self, channel: &ChannelId) -> Result<ChannelStats> {
        let mut document: StatsDocument = load_document(self.store.as_ref(), STATS_KEY)?;
        Ok(document.remove(channel).unwrap_or_default())
    }

    pub fn player_stats(&self, channel: &ChannelId, player: &PlayerId) -> Result<Option<PlayerStats>> {
        Ok(self.channel_stats(channel)?.remove(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use chrono::Duration;

    fn recorder() -> StatsRecorder {
        StatsRecorder::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn test_average_pick() {
        let stats = PlayerStats {
            total_games: 5,
            captain_count: 1,
            total_pick_weight: 10,
            ..Default::default()
        };
        assert_eq!(stats.average_pick(), 2.5);
        assert_eq!(average_stat(&stats, 4).to_string(), "2.50/4");
    }

    #[test]
    fn test_average_pick_guards_denominator() {
        let only_captain = PlayerStats {
            total_games: 2,
            captain_count: 2,
            ..Default::default()
        };
        assert_eq!(only_captain.average_pick(), 0.0);

        // Legacy data with more captaincies than games
        let inconsistent = PlayerStats {
            total_games: 1,
            captain_count: 3,
            total_pick_weight: 7,
            ..Default::default()
        };
        assert_eq!(inconsistent.average_pick(), 0.0);
    }

    #[test]
    fn test_record_fill() {
        let recorder = recorder();
        let channel = "general".to_string();
        let players = vec![Player::human("1", "alice"), Player::human("2", "bob")];
        let at = current_timestamp();

        recorder
            .record_fill(&channel, &players, &"bot".to_string(), "alice bob".to_string(), at)
            .unwrap();

        let stats = recorder.channel_stats(&channel).unwrap();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats["1"].total_games, 1);
        assert_eq!(stats["2"].last_played_at, Some(at));
        assert_eq!(stats["bot"].total_games, 1);
        assert_eq!(stats["bot"].last_roster_summary.as_deref(), Some("alice bob"));
        assert_eq!(stats["1"].last_roster_summary, None);
    }

    #[test]
    fn test_record_draft_accumulates() {
        let recorder = recorder();
        let channel = "general".to_string();
        let captain = Player::human("1", "alice");
        let picked = Player::human("2", "bob");
        let at = current_timestamp();

        for _ in 0..2 {
            recorder
                .record_draft(
                    &channel,
                    &[(&captain, 0), (&picked, 3)],
                    &"bot".to_string(),
                    "Red Team: alice Blue Team: bob".to_string(),
                    at,
                )
                .unwrap();
        }

        let alice = recorder.player_stats(&channel, &"1".to_string()).unwrap().unwrap();
        assert_eq!(alice.total_games, 2);
        assert_eq!(alice.captain_count, 2);
        assert_eq!(alice.total_pick_weight, 0);

        let bob = recorder.player_stats(&channel, &"2".to_string()).unwrap().unwrap();
        assert_eq!(bob.captain_count, 0);
        assert_eq!(bob.total_pick_weight, 6);
        assert_eq!(bob.average_pick(), 3.0);

        let lobby = recorder.player_stats(&channel, &"bot".to_string()).unwrap().unwrap();
        assert_eq!(lobby.total_games, 2);
        assert_eq!(lobby.captain_count, 0);
    }

    #[test]
    fn test_channels_do_not_clobber_each_other() {
        let recorder = recorder();
        let at = current_timestamp();
        let alice = Player::human("1", "alice");

        recorder
            .record_fill(&"a".to_string(), &[alice.clone()], &"bot".to_string(), "alice".to_string(), at)
            .unwrap();
        recorder
            .record_fill(&"b".to_string(), &[alice], &"bot".to_string(), "alice".to_string(), at)
            .unwrap();
        recorder.reset_channel(&"a".to_string()).unwrap();

        assert!(recorder.channel_stats(&"a".to_string()).unwrap().is_empty());
        assert_eq!(recorder.channel_stats(&"b".to_string()).unwrap().len(), 2);

        assert!(recorder.remove_channel(&"b".to_string()).unwrap());
        assert!(!recorder.remove_channel(&"b".to_string()).unwrap());
    }

    #[test]
    fn test_report_rendering() {
        let now = current_timestamp();
        let report = StatsReport {
            stats: PlayerStats {
                total_games: 3,
                captain_count: 1,
                total_pick_weight: 5,
                last_played_at: Some(now - Duration::hours(3)),
                last_roster_summary: None,
            },
            average: Some(AveragePick {
                average: 2.5,
                max_picks: 4,
            }),
        };
        assert_eq!(
            report.render(now),
            "Total [3] Captain [1] Avg. [2.50/4] Last [3 hours ago]"
        );

        let solo = StatsReport {
            stats: PlayerStats {
                total_games: 1,
                last_played_at: Some(now),
                last_roster_summary: Some("alice bob".to_string()),
                ..Default::default()
            },
            average: None,
        };
        assert_eq!(solo.render(now), "Total [1] Last [just now] alice bob");
    }
}
