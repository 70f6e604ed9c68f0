//! Error types for the PUG lobby service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific lobby scenarios
#[derive(Debug, thiserror::Error)]
pub enum PugError {
    #[error("Invalid lobby capacity {capacity}: must be between {min} and {max}")]
    InvalidCapacity {
        capacity: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid team capacity {capacity}: {reason}")]
    InvalidTeamCapacity { capacity: usize, reason: String },

    #[error("Storage operation failed for key '{key}': {message}")]
    StorageFailed { key: String, message: String },

    #[error("Serialization failed for key '{key}': {message}")]
    Serialization { key: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
