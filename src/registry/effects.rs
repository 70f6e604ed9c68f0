//! Side effects requested by registry operations

use crate::types::{ChannelId, Player};
use std::time::Duration;

/// Work the caller must carry out after a registry call returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post `text` in the lobby's channel
    ChannelMessage { channel: ChannelId, text: String },
    /// Privately message a player
    DirectMessage { player: Player, text: String },
    /// Call `draw_random_captains(channel)` once `delay` has passed
    ScheduleCaptainDraw { channel: ChannelId, delay: Duration },
}

impl Effect {
    pub fn channel_message(channel: &ChannelId, text: impl Into<String>) -> Self {
        Effect::ChannelMessage {
            channel: channel.clone(),
            text: text.into(),
        }
    }

    pub fn direct_message(player: &Player, text: impl Into<String>) -> Self {
        Effect::DirectMessage {
            player: player.clone(),
            text: text.into(),
        }
    }
}
