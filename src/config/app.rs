//! Main application configuration
//!
//! This module defines the primary configuration structures for the pug-room
//! lobby service, including environment variable and file loading and validation.

use crate::config::lobby::LobbyConfig;
use crate::draft::pattern::TEMPLATE_LEN;
use crate::error::PugError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub lobby: LobbyConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where lobby and statistics documents are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// JSON document path, used by the file backend
    pub path: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "pug-room".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("data/pug.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            config.storage.backend = match backend.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "file" => StorageBackend::File,
                _ => {
                    return Err(config_error(format!(
                        "Invalid STORAGE_BACKEND value: {}",
                        backend
                    )))
                }
            };
        }
        if let Ok(path) = env::var("STORAGE_PATH") {
            config.storage.path = PathBuf::from(path);
        }

        // Lobby settings
        if let Ok(delay) = env::var("CAPTAIN_DRAW_DELAY_SECONDS") {
            config.lobby.captain_draw_delay_seconds = delay
                .parse()
                .map_err(|_| {
                    config_error(format!("Invalid CAPTAIN_DRAW_DELAY_SECONDS value: {}", delay))
                })?;
        }
        if let Ok(min) = env::var("MIN_CAPACITY") {
            config.lobby.min_capacity = min
                .parse()
                .map_err(|_| config_error(format!("Invalid MIN_CAPACITY value: {}", min)))?;
        }
        if let Ok(max) = env::var("MAX_CAPACITY") {
            config.lobby.max_capacity = max
                .parse()
                .map_err(|_| config_error(format!("Invalid MAX_CAPACITY value: {}", max)))?;
        }
        if let Ok(min_team) = env::var("MIN_TEAM_CAPACITY") {
            config.lobby.min_team_capacity = min_team
                .parse()
                .map_err(|_| {
                    config_error(format!("Invalid MIN_TEAM_CAPACITY value: {}", min_team))
                })?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing fields take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }
}

fn config_error(message: String) -> anyhow::Error {
    PugError::ConfigurationError { message }.into()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    if config.service.name.is_empty() {
        return Err(config_error("Service name cannot be empty".to_string()));
    }

    if config.storage.backend == StorageBackend::File
        && config.storage.path.as_os_str().is_empty()
    {
        return Err(config_error("Storage path cannot be empty for the file backend".to_string()));
    }

    // Validate lobby limits
    let lobby = &config.lobby;
    if lobby.min_capacity < 2 {
        return Err(config_error("Minimum capacity must be at least 2".to_string()));
    }
    if lobby.max_capacity < lobby.min_capacity {
        return Err(config_error(format!(
            "Maximum capacity {} is below minimum capacity {}",
            lobby.max_capacity,
            lobby.min_capacity
        )));
    }
    if lobby.max_capacity > TEMPLATE_LEN + 2 {
        return Err(config_error(format!(
            "Maximum capacity cannot exceed {} (pick templates have {} slots)",
            TEMPLATE_LEN + 2,
            TEMPLATE_LEN
        )));
    }
    if lobby.min_team_capacity < 4 {
        return Err(config_error("Minimum team capacity must be at least 4".to_string()));
    }

    Ok(())
}
