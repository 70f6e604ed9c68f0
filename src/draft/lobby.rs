//! Lobby state machine: roster, captains and pick progression
//!
//! A lobby owns one canonical roster slot array. Captains and drafted players
//! leave a `None` marker in their slot so roster indices stay stable for the
//! whole draft, and the team lists hold the moved players in pick order.

use crate::draft::mode::{GameMode, ModConfig};
use crate::types::{LobbyId, Player, Team};
use crate::utils::generate_lobby_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Possible states of a lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyState {
    /// Accepting joins
    Open,
    /// Solo lobby is full and ready to be recorded
    Full,
    /// Team lobby is full, no captains yet
    AwaitingCaptains,
    /// Red captain chosen, blue still missing
    AwaitingSecondCaptain,
    /// Both captains set, picks in progress
    Drafting,
    /// Every player is on a team
    Complete,
}

/// Result of adding a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Already present or lobby full
    Rejected,
    Joined,
    /// Team lobby just filled; captains should be drawn
    FilledAwaitingCaptains,
    /// Solo lobby just filled; record and reset
    FilledReady,
}

impl JoinOutcome {
    pub fn is_success(self) -> bool {
        self != JoinOutcome::Rejected
    }
}

/// Result of removing a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    NotPresent,
    Left,
    /// The lobby was full, so drafted players went back to the roster first
    LeftAndReset,
}

impl LeaveOutcome {
    pub fn is_success(self) -> bool {
        self != LeaveOutcome::NotPresent
    }
}

/// Per-channel draft state for one configured mod
#[derive(Debug, Clone)]
pub struct Lobby {
    id: LobbyId,
    config: ModConfig,
    roster: Vec<Option<Player>>,
    red: Vec<Player>,
    blue: Vec<Player>,
}

impl Lobby {
    /// Create an empty lobby for a validated mod configuration
    pub fn new(config: ModConfig) -> Self {
        Self::with_id(generate_lobby_id(), config)
    }

    /// Create a lobby with a specific ID
    pub fn with_id(id: LobbyId, config: ModConfig) -> Self {
        Self {
            id,
            roster: Vec::with_capacity(config.capacity),
            config,
            red: Vec::new(),
            blue: Vec::new(),
        }
    }

    pub fn id(&self) -> LobbyId {
        self.id
    }

    pub fn config(&self) -> &ModConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn is_team_game(&self) -> bool {
        self.config.mode.is_team()
    }

    /// Roster slots, including `None` markers left by drafted players
    pub fn roster(&self) -> &[Option<Player>] {
        &self.roster
    }

    /// Players still waiting to be picked, with their slot index
    pub fn undrafted(&self) -> impl Iterator<Item = (usize, &Player)> {
        self.roster
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (i, p)))
    }

    pub fn red_team(&self) -> &[Player] {
        &self.red
    }

    pub fn blue_team(&self) -> &[Player] {
        &self.blue
    }

    pub fn team(&self, team: Team) -> &[Player] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut Vec<Player> {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    /// Number of people in the lobby, wherever they currently sit
    pub fn player_count(&self) -> usize {
        self.undrafted().count() + self.red.len() + self.blue.len()
    }

    /// Full means every slot was taken at some point since the last reset
    pub fn is_full(&self) -> bool {
        self.roster.len() == self.config.capacity
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.roster.iter().flatten().any(|p| p == player)
            || self.red.contains(player)
            || self.blue.contains(player)
    }

    pub fn captain(&self, team: Team) -> Option<&Player> {
        self.team(team).first()
    }

    pub fn has_captains(&self) -> bool {
        !self.red.is_empty() && !self.blue.is_empty()
    }

    /// Drafted players including captains
    fn drafted_count(&self) -> usize {
        self.red.len() + self.blue.len()
    }

    /// Team on the clock, once both captains exist and picks remain
    pub fn current_team_turn(&self) -> Option<Team> {
        let pattern = self.config.mode.pick_pattern()?;
        if !self.has_captains() {
            return None;
        }
        pattern.team_at(self.config.capacity, self.drafted_count() - 2)
    }

    pub fn current_captain(&self) -> Option<&Player> {
        self.current_team_turn().and_then(|team| self.captain(team))
    }

    pub fn is_captain_turn(&self, player: &Player, team: Team) -> bool {
        self.captain(team) == Some(player) && self.current_team_turn() == Some(team)
    }

    pub fn teams_ready(&self) -> bool {
        self.is_team_game() && self.drafted_count() == self.config.capacity
    }

    pub fn state(&self) -> LobbyState {
        if !self.is_full() {
            return LobbyState::Open;
        }
        if !self.is_team_game() {
            return LobbyState::Full;
        }
        if self.teams_ready() {
            LobbyState::Complete
        } else if self.has_captains() {
            LobbyState::Drafting
        } else if !self.red.is_empty() {
            LobbyState::AwaitingSecondCaptain
        } else {
            LobbyState::AwaitingCaptains
        }
    }

    /// Append a player to the roster
    pub fn add_player(&mut self, player: Player) -> JoinOutcome {
        if self.is_full() || self.contains(&player) {
            return JoinOutcome::Rejected;
        }

        self.roster.push(Some(player));
        debug_assert!(self.invariants_hold());

        match (self.is_full(), self.is_team_game()) {
            (false, _) => JoinOutcome::Joined,
            (true, true) => JoinOutcome::FilledAwaitingCaptains,
            (true, false) => JoinOutcome::FilledReady,
        }
    }

    /// Remove a player from wherever they are
    pub fn remove_player(&mut self, player: &Player) -> LeaveOutcome {
        if !self.contains(player) {
            return LeaveOutcome::NotPresent;
        }

        let was_full = self.is_full();
        if was_full {
            self.reset();
        }

        if let Some(index) = self
            .roster
            .iter()
            .position(|slot| slot.as_ref() == Some(player))
        {
            self.roster.remove(index);
        }
        debug_assert!(self.invariants_hold());

        if was_full {
            LeaveOutcome::LeftAndReset
        } else {
            LeaveOutcome::Left
        }
    }

    /// Make `player` the next captain; red first, then blue
    pub fn set_captain(&mut self, player: &Player) -> Option<Team> {
        if !self.is_team_game() || !self.is_full() {
            return None;
        }

        let index = self
            .roster
            .iter()
            .position(|slot| slot.as_ref() == Some(player))?;
        self.set_captain_at(index)
    }

    /// Make the player in roster slot `index` the next captain
    pub fn set_captain_at(&mut self, index: usize) -> Option<Team> {
        if !self.is_team_game() || !self.is_full() {
            return None;
        }

        let team = if self.red.is_empty() {
            Team::Red
        } else if self.blue.is_empty() {
            Team::Blue
        } else {
            return None;
        };

        let player = self.roster.get_mut(index)?.take()?;
        self.team_mut(team).push(player);
        debug_assert!(self.invariants_hold());

        Some(team)
    }

    /// Draft the player in roster slot `index` for `captain`'s team.
    ///
    /// Returns the team that picked, or `None` if the pick was not allowed.
    pub fn pick_player(&mut self, captain: &Player, index: usize) -> Option<Team> {
        if !self.is_team_game() || !self.is_full() || !self.has_captains() {
            return None;
        }

        let team = self.current_team_turn()?;
        if !self.is_captain_turn(captain, team) {
            return None;
        }

        let player = self.roster.get_mut(index)?.take()?;
        self.team_mut(team).push(player);
        self.complete_forced_picks();
        debug_assert!(self.invariants_hold());

        Some(team)
    }

    /// Hand every undrafted player to one team when the rest of the
    /// pattern belongs to that team alone.
    fn complete_forced_picks(&mut self) {
        let Some(pattern) = self.config.mode.pick_pattern() else {
            return;
        };
        let next_pick = self.drafted_count() - 2;
        let Some(team) = pattern.forced_team_from(self.config.capacity, next_pick) else {
            return;
        };

        let remaining: Vec<Player> = self.roster.iter_mut().filter_map(Option::take).collect();
        self.team_mut(team).extend(remaining);
    }

    /// Soft reset: drafted players return to the roster, red then blue then
    /// the undrafted remainder.
    pub fn reset(&mut self) {
        if !self.is_team_game() {
            return;
        }

        let roster = std::mem::take(&mut self.roster);
        self.roster = self
            .red
            .drain(..)
            .chain(self.blue.drain(..))
            .chain(roster.into_iter().flatten())
            .map(Some)
            .collect();
        debug_assert!(self.invariants_hold());
    }

    /// Drop everyone
    pub fn full_reset(&mut self) {
        self.roster.clear();
        self.red.clear();
        self.blue.clear();
    }

    /// Every player sits in exactly one place and every roster slot is
    /// accounted for.
    pub fn invariants_hold(&self) -> bool {
        let mut seen = HashSet::new();
        let everyone = self
            .roster
            .iter()
            .flatten()
            .chain(self.red.iter())
            .chain(self.blue.iter());
        for player in everyone {
            if !seen.insert(&player.id) {
                return false;
            }
        }

        let undrafted = self.roster.iter().flatten().count();
        let teams_allowed = self.is_team_game() || (self.red.is_empty() && self.blue.is_empty());

        teams_allowed
            && self.roster.len() <= self.config.capacity
            && undrafted + self.red.len() + self.blue.len() == self.roster.len()
    }
}
