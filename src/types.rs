//! Common types used throughout the lobby service

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for chat users
pub type PlayerId = String;

/// Unique identifier for chat channels
pub type ChannelId = String;

/// Unique identifier for lobbies
pub type LobbyId = Uuid;

/// A chat user as seen by the lobby service.
///
/// Identity is the `id` alone: two values with the same id compare equal even
/// if the display name changed in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub mention: String,
    pub is_bot: bool,
}

impl Player {
    /// Create a human player with a `<@id>` mention
    pub fn human(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            mention: format!("<@{}>", id),
            id,
            name: name.into(),
            is_bot: false,
        }
    }

    /// Create an automated account
    pub fn bot(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::human(id, name)
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One of the two drafted sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Red => write!(f, "Red Team"),
            Team::Blue => write!(f, "Blue Team"),
        }
    }
}
