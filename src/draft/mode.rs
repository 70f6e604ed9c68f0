//! Game modes and per-channel mod configuration

use crate::config::LobbyConfig;
use crate::draft::pattern::PickPattern;
use crate::error::{PugError, Result};
use serde::{Deserialize, Serialize};

/// How a full lobby is turned into a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Everyone plays; the lobby completes as soon as it fills
    Solo,
    /// Two captains draft the roster following the pattern
    Team(PickPattern),
}

impl GameMode {
    pub fn is_team(&self) -> bool {
        matches!(self, GameMode::Team(_))
    }

    pub fn pick_pattern(&self) -> Option<PickPattern> {
        match self {
            GameMode::Solo => None,
            GameMode::Team(pattern) => Some(*pattern),
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Solo => write!(f, "solo"),
            GameMode::Team(_) => write!(f, "team"),
        }
    }
}

/// The game-mode template bound to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModConfig {
    pub name: String,
    pub capacity: usize,
    pub mode: GameMode,
}

impl ModConfig {
    /// Validate and build a mod configuration.
    ///
    /// A capacity of exactly 2 is always solo. Team games need an even
    /// capacity of at least `limits.min_team_capacity`.
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        teams_enabled: bool,
        limits: &LobbyConfig,
    ) -> Result<Self> {
        let teams_enabled = teams_enabled && capacity != 2;

        if capacity < limits.min_capacity || capacity > limits.max_capacity {
            return Err(PugError::InvalidCapacity {
                capacity,
                min: limits.min_capacity,
                max: limits.max_capacity,
            }
            .into());
        }

        if teams_enabled {
            if capacity < limits.min_team_capacity {
                return Err(PugError::InvalidTeamCapacity {
                    capacity,
                    reason: format!("team games need at least {} players", limits.min_team_capacity),
                }
                .into());
            }
            if capacity % 2 == 1 {
                return Err(PugError::InvalidTeamCapacity {
                    capacity,
                    reason: "team games need an even number of players".to_string(),
                }
                .into());
            }
        }

        let mode = if teams_enabled {
            GameMode::Team(PickPattern::for_capacity(capacity))
        } else {
            GameMode::Solo
        };

        Ok(Self {
            name: name.into(),
            capacity,
            mode,
        })
    }

    /// Picks available after both captains are chosen
    pub fn max_picks(&self) -> usize {
        self.capacity.saturating_sub(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> LobbyConfig {
        LobbyConfig::default()
    }

    #[test]
    fn test_capacity_two_forces_solo() {
        let config = ModConfig::new("duel", 2, true, &limits()).unwrap();
        assert_eq!(config.mode, GameMode::Solo);
    }

    #[test]
    fn test_team_pattern_selection() {
        let config = ModConfig::new("2v2", 4, true, &limits()).unwrap();
        assert_eq!(config.mode, GameMode::Team(PickPattern::Alternating));

        let config = ModConfig::new("5v5", 10, true, &limits()).unwrap();
        assert_eq!(config.mode, GameMode::Team(PickPattern::Paired));
        assert_eq!(config.max_picks(), 8);
    }

    #[test]
    fn test_capacity_out_of_range() {
        for capacity in [0, 1, 11, 64] {
            let err = ModConfig::new("bad", capacity, false, &limits()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PugError>(),
                Some(PugError::InvalidCapacity { .. })
            ));
        }
    }

    #[test]
    fn test_team_capacity_rules() {
        for capacity in [3, 5, 7, 9] {
            let err = ModConfig::new("odd", capacity, true, &limits()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PugError>(),
                Some(PugError::InvalidTeamCapacity { .. })
            ));
        }

        // Odd capacities are fine without teams
        let config = ModConfig::new("ffa", 5, false, &limits()).unwrap();
        assert_eq!(config.mode, GameMode::Solo);
    }
}
