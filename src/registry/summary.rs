//! Read-only views of a lobby for display

use crate::draft::Lobby;
use crate::types::Team;
use crate::utils::join_names;

/// Lobby name, fill level and the undrafted players by 1-based slot number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub name: String,
    pub player_count: usize,
    pub capacity: usize,
    /// `(slot number, player name)`; slot numbers are what captains pick by
    pub slots: Vec<(usize, String)>,
}

impl RosterSummary {
    pub fn from_lobby(lobby: &Lobby) -> Self {
        Self {
            name: lobby.name().to_string(),
            player_count: lobby.player_count(),
            capacity: lobby.capacity(),
            slots: lobby
                .undrafted()
                .map(|(i, player)| (i + 1, player.name.clone()))
                .collect(),
        }
    }
}

impl std::fmt::Display for RosterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}/{}]", self.name, self.player_count, self.capacity)?;
        for (slot, name) in &self.slots {
            write!(f, " {}) {}", slot, name)?;
        }
        Ok(())
    }
}

/// Current membership of both teams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamsSummary {
    pub red: String,
    pub blue: String,
}

impl TeamsSummary {
    pub fn from_lobby(lobby: &Lobby) -> Self {
        Self {
            red: join_names(lobby.team(Team::Red)),
            blue: join_names(lobby.team(Team::Blue)),
        }
    }

    /// Both teams on one line, as stored with channel statistics
    pub fn single_line(&self) -> String {
        format!("{}: {} {}: {}", Team::Red, self.red, Team::Blue, self.blue)
    }
}

impl std::fmt::Display for TeamsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}\n{}: {}", Team::Red, self.red, Team::Blue, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LobbyConfig;
    use crate::draft::ModConfig;
    use crate::types::Player;

    fn lobby_with(names: &[&str]) -> (Lobby, Vec<Player>) {
        let config = ModConfig::new("ctf", 4, true, &LobbyConfig::default()).unwrap();
        let mut lobby = Lobby::new(config);
        let players: Vec<Player> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::human(i.to_string(), *name))
            .collect();
        for player in &players {
            lobby.add_player(player.clone());
        }
        (lobby, players)
    }

    #[test]
    fn test_roster_summary_open_lobby() {
        let (lobby, _) = lobby_with(&["alice", "bob"]);
        assert_eq!(
            RosterSummary::from_lobby(&lobby).to_string(),
            "ctf [2/4] 1) alice 2) bob"
        );
    }

    #[test]
    fn test_roster_summary_skips_drafted_slots() {
        let (mut lobby, players) = lobby_with(&["alice", "bob", "carol", "dave"]);
        lobby.set_captain(&players[1]);

        let summary = RosterSummary::from_lobby(&lobby);
        assert_eq!(summary.player_count, 4);
        assert_eq!(summary.to_string(), "ctf [4/4] 1) alice 3) carol 4) dave");
    }

    #[test]
    fn test_teams_summary() {
        let (mut lobby, players) = lobby_with(&["alice", "bob", "carol", "dave"]);
        lobby.set_captain(&players[0]);
        lobby.set_captain(&players[1]);
        lobby.pick_player(&players[0], 3);

        let teams = TeamsSummary::from_lobby(&lobby);
        assert_eq!(teams.to_string(), "Red Team: alice dave\nBlue Team: bob carol");
        assert_eq!(
            teams.single_line(),
            "Red Team: alice dave Blue Team: bob carol"
        );
    }
}
