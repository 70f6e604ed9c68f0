//! Configuration management for the pug-room service
//!
//! This module handles all configuration loading from environment variables
//! or TOML files, validation, and default values for the lobby service.

pub mod app;
pub mod lobby;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StorageBackend, StorageSettings};
pub use lobby::LobbyConfig;
