//! Pursuit stepping, timeline construction, and frame lookup for the
//! `AuraPnL` blob battle.
//!
//! The simulation is a pure function of its configuration: the world is
//! drawn once from a seeded RNG, the hero is stepped through every frame in
//! order, and the resulting snapshots are frozen into a [`Timeline`] that
//! any number of readers can index without locks.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `aurapnl-config.yaml` into
//!   strongly-typed structs.
//! - [`stepper`] -- Target acquisition, smoothed steering, consumption, and
//!   the attraction field for one frame.
//! - [`timeline`] -- The sequential pass that produces every snapshot.
//! - [`accessor`] -- Random-access, hold-last-frame lookup.
//!
//! [`Timeline`]: timeline::Timeline

pub mod accessor;
pub mod config;
pub mod stepper;
pub mod timeline;

pub use accessor::{AccessError, FrameAccessor};
pub use config::{ConfigError, SimulationConfig};
pub use stepper::{PursuitState, StepOutcome, step};
pub use timeline::{Timeline, TimelineError, TimelineSummary, build_timeline};

use aurapnl_world::{WorldError, initialize_seeded};
use tracing::debug;

/// Errors that can occur while turning a configuration into a timeline.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The world initializer rejected its parameters.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The timeline could not be built.
    #[error("timeline error: {source}")]
    Timeline {
        /// The underlying timeline error.
        #[from]
        source: TimelineError,
    },
}

/// Validate `config`, draw the world from its seed, and build the full
/// timeline.
///
/// Identical configurations produce identical timelines.
///
/// # Errors
///
/// Returns [`SimulationError`] if validation, initialization, or the build
/// fails. Nothing is simulated unless validation passes.
pub fn simulate(config: &SimulationConfig) -> Result<Timeline, SimulationError> {
    config.validate()?;
    let world = initialize_seeded(&config.world.setup())?;
    debug!(seed = config.world.seed, "World initialized");
    Ok(build_timeline(world, &config.pursuit, config.world.final_frame)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig::new(WorldConfig {
            agent_count: 6,
            token_count: 40,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            final_frame: 90,
            seed,
        })
    }

    #[test]
    fn simulate_builds_full_timeline() {
        let timeline = simulate(&config(11)).unwrap();
        assert_eq!(timeline.len(), 91);
        assert_eq!(timeline.world().agents.len(), 6);
        assert_eq!(timeline.world().tokens.len(), 40);
    }

    #[test]
    fn simulate_rejects_invalid_config_before_running() {
        let mut bad = config(11);
        bad.world.token_count = 0;
        assert!(matches!(
            simulate(&bad),
            Err(SimulationError::Config { .. })
        ));

        let mut bad = config(11);
        bad.pursuit.smoothing = 1.5;
        assert!(matches!(
            simulate(&bad),
            Err(SimulationError::Config { .. })
        ));
    }

    #[test]
    fn same_seed_same_timeline() {
        let a = simulate(&config(42)).unwrap();
        let b = simulate(&config(42)).unwrap();
        assert!(a.snapshots().eq(b.snapshots()));
    }
}
