//! Pick-order weighting
//!
//! A player's weight is the 1-based draft step at which their team picked
//! them. Captains always weigh 0.

use crate::draft::{Lobby, PickPattern};
use crate::types::{Player, Team};

/// Weights for one team: `[0]` for the captain followed by the 1-based
/// positions of that team's picks within the first `capacity - 2` steps.
pub fn pick_weights(pattern: PickPattern, capacity: usize, team: Team) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            pattern
                .picks(capacity)
                .iter()
                .enumerate()
                .filter(|(_, picker)| **picker == team)
                .map(|(i, _)| i as u32 + 1),
        )
        .collect()
}

/// Red weights followed by blue weights, aligned with `red ++ blue`.
///
/// Empty for solo lobbies.
pub fn pick_order(lobby: &Lobby) -> Vec<u32> {
    let Some(pattern) = lobby.mode().pick_pattern() else {
        return Vec::new();
    };

    let mut order = pick_weights(pattern, lobby.capacity(), Team::Red);
    order.extend(pick_weights(pattern, lobby.capacity(), Team::Blue));
    order
}

/// Every drafted player paired with their pick weight
pub fn weighted_players(lobby: &Lobby) -> Vec<(&Player, u32)> {
    lobby
        .red_team()
        .iter()
        .chain(lobby.blue_team())
        .zip(pick_order(lobby))
        .collect()
}
