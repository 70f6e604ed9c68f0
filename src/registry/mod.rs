//! Lobby registry and statistics
//!
//! This module maps channels to lobbies, drives their lifecycle, derives
//! pick-order weights and keeps per-channel player statistics.

pub mod effects;
pub mod manager;
pub mod stats;
pub mod summary;
pub mod weighting;

// Re-export main types
pub use effects::Effect;
pub use manager::{LobbyRegistry, RegistryStats};
pub use stats::{average_stat, AveragePick, ChannelStats, PlayerStats, StatsRecorder, StatsReport};
pub use summary::{RosterSummary, TeamsSummary};
pub use weighting::{pick_order, pick_weights, weighted_players};
