//! Metrics collection using Prometheus
//!
//! Counters and histograms for lobby lifecycle, joins, drafts and resets.

use crate::draft::GameMode;
use anyhow::Result;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the PUG service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Lobby lifecycle metrics
    lobby_metrics: LobbyMetrics,

    /// Draft progress metrics
    draft_metrics: DraftMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Lobby lifecycle metrics
#[derive(Clone)]
pub struct LobbyMetrics {
    /// Number of configured lobbies by mode
    pub active_lobbies: IntGaugeVec,

    /// Total lobbies configured
    pub lobbies_configured_total: IntCounterVec,

    /// Total lobbies removed
    pub lobbies_removed_total: IntCounter,

    /// Total players that joined a lobby
    pub players_joined_total: IntCounterVec,

    /// Total players that left a lobby
    pub players_left_total: IntCounterVec,

    /// Lobby resets by kind (soft, full)
    pub resets_total: IntCounterVec,
}

/// Draft progress metrics
#[derive(Clone)]
pub struct DraftMetrics {
    /// Completed games (solo fills and finished drafts)
    pub games_completed_total: IntCounterVec,

    /// Captains drawn at random
    pub captain_draws_total: IntCounter,

    /// Manual picks made by captains
    pub picks_total: IntCounter,

    /// Players assigned by auto-complete
    pub auto_assigned_total: IntCounter,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Lobby operation durations
    pub lobby_operation_duration: HistogramVec,

    /// Statistics persistence durations
    pub stats_write_duration: HistogramVec,
}

fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Solo => "solo",
        GameMode::Team(_) => "team",
    }
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let lobby_metrics = LobbyMetrics::new(&registry)?;
        let draft_metrics = DraftMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            lobby_metrics,
            draft_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn lobby(&self) -> &LobbyMetrics {
        &self.lobby_metrics
    }

    pub fn draft(&self) -> &DraftMetrics {
        &self.draft_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a lobby being configured for a channel
    pub fn record_lobby_configured(&self, mode: GameMode) {
        let mode = mode_label(mode);
        self.lobby_metrics
            .lobbies_configured_total
            .with_label_values(&[mode])
            .inc();
        self.lobby_metrics
            .active_lobbies
            .with_label_values(&[mode])
            .inc();
    }

    /// Record a configured lobby being dropped, either removed or replaced
    pub fn record_lobby_removed(&self, mode: GameMode) {
        self.lobby_metrics.lobbies_removed_total.inc();
        self.lobby_metrics
            .active_lobbies
            .with_label_values(&[mode_label(mode)])
            .dec();
    }

    pub fn record_player_joined(&self, mode: GameMode) {
        self.lobby_metrics
            .players_joined_total
            .with_label_values(&[mode_label(mode)])
            .inc();
    }

    pub fn record_player_left(&self, mode: GameMode) {
        self.lobby_metrics
            .players_left_total
            .with_label_values(&[mode_label(mode)])
            .inc();
    }

    /// Record a reset; `kind` is `"soft"` or `"full"`
    pub fn record_reset(&self, kind: &str) {
        self.lobby_metrics
            .resets_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn record_game_completed(&self, mode: GameMode) {
        self.draft_metrics
            .games_completed_total
            .with_label_values(&[mode_label(mode)])
            .inc();
    }

    pub fn record_captain_draw(&self) {
        self.draft_metrics.captain_draws_total.inc();
    }

    /// Record a manual pick and how many players auto-complete assigned after it
    pub fn record_pick(&self, auto_assigned: usize) {
        self.draft_metrics.picks_total.inc();
        self.draft_metrics
            .auto_assigned_total
            .inc_by(auto_assigned as u64);
    }

    /// Record lobby operation duration
    pub fn record_lobby_operation(&self, operation: &str, duration: Duration) {
        self.performance_metrics
            .lobby_operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    pub fn record_stats_write(&self, success: bool, duration: Duration) {
        let status = if success { "success" } else { "error" };
        self.performance_metrics
            .stats_write_duration
            .with_label_values(&[status])
            .observe(duration.as_secs_f64());
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl LobbyMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let active_lobbies = IntGaugeVec::new(
            Opts::new("pug_room_active_lobbies", "Number of configured lobbies"),
            &["mode"],
        )?;
        registry.register(Box::new(active_lobbies.clone()))?;

        let lobbies_configured_total = IntCounterVec::new(
            Opts::new(
                "pug_room_lobbies_configured_total",
                "Total lobbies configured",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(lobbies_configured_total.clone()))?;

        let lobbies_removed_total =
            IntCounter::new("pug_room_lobbies_removed_total", "Total lobbies removed")?;
        registry.register(Box::new(lobbies_removed_total.clone()))?;

        let players_joined_total = IntCounterVec::new(
            Opts::new("pug_room_players_joined_total", "Total players joined"),
            &["mode"],
        )?;
        registry.register(Box::new(players_joined_total.clone()))?;

        let players_left_total = IntCounterVec::new(
            Opts::new("pug_room_players_left_total", "Total players left"),
            &["mode"],
        )?;
        registry.register(Box::new(players_left_total.clone()))?;

        let resets_total = IntCounterVec::new(
            Opts::new("pug_room_resets_total", "Lobby resets"),
            &["kind"],
        )?;
        registry.register(Box::new(resets_total.clone()))?;

        Ok(Self {
            active_lobbies,
            lobbies_configured_total,
            lobbies_removed_total,
            players_joined_total,
            players_left_total,
            resets_total,
        })
    }
}

impl DraftMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let games_completed_total = IntCounterVec::new(
            Opts::new("pug_room_games_completed_total", "Total games completed"),
            &["mode"],
        )?;
        registry.register(Box::new(games_completed_total.clone()))?;

        let captain_draws_total =
            IntCounter::new("pug_room_captain_draws_total", "Random captain draws")?;
        registry.register(Box::new(captain_draws_total.clone()))?;

        let picks_total = IntCounter::new("pug_room_picks_total", "Manual captain picks")?;
        registry.register(Box::new(picks_total.clone()))?;

        let auto_assigned_total = IntCounter::new(
            "pug_room_auto_assigned_total",
            "Players assigned by draft auto-complete",
        )?;
        registry.register(Box::new(auto_assigned_total.clone()))?;

        Ok(Self {
            games_completed_total,
            captain_draws_total,
            picks_total,
            auto_assigned_total,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let lobby_operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "pug_room_lobby_operation_duration_seconds",
                "Lobby operation duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["operation"],
        )?;
        registry.register(Box::new(lobby_operation_duration.clone()))?;

        let stats_write_duration = HistogramVec::new(
            HistogramOpts::new(
                "pug_room_stats_write_duration_seconds",
                "Statistics persistence duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["status"],
        )?;
        registry.register(Box::new(stats_write_duration.clone()))?;

        Ok(Self {
            lobby_operation_duration,
            stats_write_duration,
        })
    }
}
