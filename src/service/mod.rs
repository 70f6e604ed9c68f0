//! Service layer for the pug-room lobby service
//!
//! This module contains the async service façade that wires configuration,
//! storage, messaging and scheduling around the lobby registry.

pub mod app;
pub mod logging;

pub use app::{open_store, PugService};
pub use logging::init_logging;
