//! Lobby configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied when a channel configures a lobby, plus draft timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Smallest accepted lobby capacity
    pub min_capacity: usize,
    /// Largest accepted lobby capacity
    pub max_capacity: usize,
    /// Smallest capacity that can run a captain draft
    pub min_team_capacity: usize,
    /// Delay between a team lobby filling and the random captain draw
    pub captain_draw_delay_seconds: u64,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            min_capacity: 2,
            max_capacity: 10,
            min_team_capacity: 4,
            captain_draw_delay_seconds: 10,
        }
    }
}

impl LobbyConfig {
    /// Get the captain draw delay as a Duration
    pub fn captain_draw_delay(&self) -> Duration {
        Duration::from_secs(self.captain_draw_delay_seconds)
    }
}
