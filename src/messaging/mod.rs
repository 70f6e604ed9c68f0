//! Outbound chat messages
//!
//! The registry never talks to the chat platform directly; the service hands
//! its message effects to a [`MessageSink`].

pub mod sinks;

use crate::error::Result;
use crate::types::{ChannelId, Player};
use async_trait::async_trait;

pub use sinks::{LoggingSink, RecordingSink, SentMessage};

/// Trait for delivering chat messages
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Post a message in a channel
    async fn send_channel_message(&self, channel: &ChannelId, text: &str) -> Result<()>;

    /// Privately message a player
    async fn send_direct_message(&self, player: &Player, text: &str) -> Result<()>;
}
