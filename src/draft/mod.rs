//! Draft engine for pick-up game lobbies
//!
//! This module holds the per-channel lobby state machine, the game modes a
//! channel can configure, and the fixed pick-order templates. It performs no
//! I/O; callers act on the outcomes it returns.

pub mod lobby;
pub mod mode;
pub mod pattern;

// Re-export commonly used types
pub use lobby::{JoinOutcome, LeaveOutcome, Lobby, LobbyState};
pub use mode::{GameMode, ModConfig};
pub use pattern::PickPattern;
