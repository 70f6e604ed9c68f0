//! Message sink implementations

use crate::error::Result;
use crate::messaging::MessageSink;
use crate::types::{ChannelId, Player, PlayerId};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Sink that only writes messages to the log
#[derive(Debug, Default)]
pub struct LoggingSink;

#[async_trait]
impl MessageSink for LoggingSink {
    async fn send_channel_message(&self, channel: &ChannelId, text: &str) -> Result<()> {
        info!(channel = %channel, "{}", text);
        Ok(())
    }

    async fn send_direct_message(&self, player: &Player, text: &str) -> Result<()> {
        info!(player = %player.id, "{}", text);
        Ok(())
    }
}

/// A message captured by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Channel { channel: ChannelId, text: String },
    Direct { player: PlayerId, text: String },
}

/// Sink that keeps every message in memory (for testing)
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Texts posted in `channel`, in order
    pub fn channel_messages(&self, channel: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|message| match message {
                SentMessage::Channel { channel: c, text } if c == channel => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Texts sent privately to `player`, in order
    pub fn direct_messages(&self, player: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|message| match message {
                SentMessage::Direct { player: p, text } if p == player => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_channel_message(&self, channel: &ChannelId, text: &str) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage::Channel {
                channel: channel.clone(),
                text: text.to_string(),
            });
        }
        Ok(())
    }

    async fn send_direct_message(&self, player: &Player, text: &str) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage::Direct {
                player: player.id.clone(),
                text: text.to_string(),
            });
        }
        Ok(())
    }
}
