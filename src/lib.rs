//! Pug Room - pick-up game lobbies for chat channels
//!
//! This crate provides channel-scoped lobbies that fill up with players,
//! captain drafts with fixed pick orders, and per-channel player statistics.

pub mod config;
pub mod draft;
pub mod error;
pub mod messaging;
pub mod metrics;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{PugError, Result};
pub use types::*;

// Re-export key components
pub use draft::{GameMode, Lobby, ModConfig, PickPattern};
pub use messaging::MessageSink;
pub use registry::{Effect, LobbyRegistry};
pub use scheduler::DelayScheduler;
pub use service::PugService;
pub use storage::KeyValueStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
