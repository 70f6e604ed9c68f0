//! Metrics for the PUG service
//!
//! Prometheus counters, gauges and histograms for lobby activity. The
//! collector owns its own registry; exposing it is left to the embedding
//! application.

pub mod collector;

pub use collector::{DraftMetrics, LobbyMetrics, MetricsCollector, MetricsTimer, PerformanceMetrics};
