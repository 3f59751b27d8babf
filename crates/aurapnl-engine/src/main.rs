//! Driver binary for the `AuraPnL` blob battle.
//!
//! Loads configuration, builds the full timeline, summarizes the wallet
//! history alongside it, and optionally writes every frame to JSON for the
//! renderer.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `aurapnl-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Validate the configuration
//! 4. Build the timeline on a blocking thread while the history file, if
//!    any, is read and summarized
//! 5. Log the run summary and the final leaderboard
//! 6. Export frames if `output.frames_path` is set

mod error;
mod export;

use std::path::{Path, PathBuf};

use aurapnl_core::config::{LogFormat, LoggingConfig};
use aurapnl_core::{SimulationConfig, Timeline};
use aurapnl_history::{HistoryStats, compute_stats, parse_response, ranked_by_abs_pnl};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file used when no path argument is given.
const DEFAULT_CONFIG_PATH: &str = "aurapnl-config.yaml";

/// Number of leaderboard entries and history positions logged.
const REPORT_DEPTH: usize = 5;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the timeline cannot
/// be built, the history file cannot be read, or the export fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SimulationConfig::from_file(&config_path).map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(config = %config_path.display(), "aurapnl-engine starting");
    info!(
        agents = config.world.agent_count,
        tokens = config.world.token_count,
        width = config.world.canvas_width,
        height = config.world.canvas_height,
        final_frame = config.world.final_frame,
        seed = config.world.seed,
        "Configuration loaded"
    );

    // 3. Validate before any work starts.
    config.validate().map_err(EngineError::from)?;

    // 4. Build the timeline and load history concurrently.
    let (timeline, history) = run(&config).await?;

    // 5. Report.
    log_timeline(&timeline, config.output.reward_window);
    if let Some(stats) = &history {
        log_history(stats);
    }

    // 6. Export.
    if let Some(path) = &config.output.frames_path {
        export::write_frames(path, &timeline, config.output.fps).await?;
    }

    info!("aurapnl-engine finished");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
    }
}

/// Build the timeline on the blocking pool while the history file is read.
///
/// The build itself is synchronous and CPU-bound; history loading is the
/// only work allowed to overlap with it.
async fn run(config: &SimulationConfig) -> Result<(Timeline, Option<HistoryStats>), EngineError> {
    let build_config = config.clone();
    let build = tokio::task::spawn_blocking(move || aurapnl_core::simulate(&build_config));
    let history = async {
        match &config.output.history_path {
            Some(path) => load_history(path).await.map(Some),
            None => Ok(None),
        }
    };

    let (built, history) = tokio::join!(build, history);
    let timeline = built??;
    Ok((timeline, history?))
}

/// Read, parse, and summarize a saved history API response.
async fn load_history(path: &Path) -> Result<HistoryStats, EngineError> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let records = parse_response(&body)?;
    let stats = compute_stats(&records)?;
    for (rank, position) in ranked_by_abs_pnl(&records)?
        .iter()
        .take(REPORT_DEPTH)
        .enumerate()
    {
        info!(
            rank = rank.saturating_add(1),
            symbol = %position.symbol,
            pnl = %position.pnl,
            roi = %position.roi,
            "History position"
        );
    }
    Ok(stats)
}

/// Log the run summary and the final standings.
fn log_timeline(timeline: &Timeline, reward_window: u32) {
    let summary = timeline.summary();
    info!(
        frames = summary.frames,
        consumed = summary.tokens_consumed,
        remaining = summary.tokens_remaining,
        first_consumption = ?summary.first_consumption,
        last_consumption = ?summary.last_consumption,
        final_score = summary.final_hero_score,
        "Timeline summary"
    );

    let last = timeline.get(timeline.final_frame());
    for (rank, agent) in last.leaderboard().into_iter().take(REPORT_DEPTH).enumerate() {
        info!(
            rank = rank.saturating_add(1),
            label = %agent.label,
            score = agent.score,
            hero = agent.role.is_hero(),
            "Leaderboard"
        );
    }
    info!(
        active_rewards = last.active_rewards(reward_window).count(),
        total_rewarded = last.total_rewarded(),
        "Final frame rewards"
    );
}

/// Log the wallet history headline numbers.
fn log_history(stats: &HistoryStats) {
    info!(
        count = stats.count,
        total_pnl = %stats.total_pnl,
        total_volume = %stats.total_volume,
        win_rate = %stats.win_rate,
        best_token = stats.best_token.as_deref().unwrap_or("n/a"),
        max_roi = ?stats.max_roi,
        "History summary"
    );
}
