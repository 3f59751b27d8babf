//! Configuration loading and typed config structures for the blob battle.
//!
//! The canonical configuration lives in `aurapnl-config.yaml`. The `world`
//! section is required in full: population, canvas, duration, and seed are
//! never guessed. Everything else (pursuit tuning, output, logging) has
//! defaults matching the product values.

use std::path::{Path, PathBuf};

use aurapnl_types::{Canvas, Vec2};
use aurapnl_world::{WorldError, WorldSetup};
use serde::Deserialize;

/// Longest timeline a single precompute pass may build (20 minutes at 30 fps).
pub const MAX_FINAL_FRAME: u32 = 36_000;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The world parameters cannot produce a population.
    #[error("invalid world parameters: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `aurapnl-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Population, canvas, duration, and seed. Required.
    pub world: WorldConfig,

    /// Hero pursuit tuning.
    #[serde(default)]
    pub pursuit: PursuitConfig,

    /// Frame export and history input settings for the driver.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Build a configuration from explicit world parameters and default
    /// tuning.
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            pursuit: PursuitConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or the
    /// `world` section is incomplete.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every section. Runs before any simulation work, so a bad
    /// configuration never produces a partial timeline.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.pursuit.validate()?;
        self.output.validate()
    }
}

/// World-level configuration. Every field is required.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    /// Total agents, hero included.
    pub agent_count: u32,
    /// Number of reward tokens.
    pub token_count: u32,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Index of the last simulated frame; the timeline has `final_frame + 1`
    /// snapshots.
    pub final_frame: u32,
    /// Random seed for reproducible initialization.
    pub seed: u64,
}

impl WorldConfig {
    /// The canvas described by this section.
    pub const fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Parameters for the world initializer.
    pub const fn setup(&self) -> WorldSetup {
        WorldSetup {
            agent_count: self.agent_count,
            token_count: self.token_count,
            canvas: self.canvas(),
            seed: self.seed,
        }
    }

    /// Validate population, canvas, and duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::World`] for population or canvas problems and
    /// [`ConfigError::Invalid`] for an out-of-range `final_frame`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.setup().validate()?;
        if self.final_frame == 0 {
            return Err(ConfigError::Invalid {
                reason: "final_frame must be at least 1".to_owned(),
            });
        }
        if self.final_frame > MAX_FINAL_FRAME {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "final_frame {} exceeds the maximum of {MAX_FINAL_FRAME}",
                    self.final_frame
                ),
            });
        }
        Ok(())
    }
}

/// Tuning for the hero's pursuit, consumption, and attraction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PursuitConfig {
    /// Top speed at score zero, in pixels per frame.
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,

    /// Speed floor; the hero never slows below this.
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Score that costs one pixel per frame of top speed.
    #[serde(default = "default_score_speed_divisor")]
    pub score_speed_divisor: f64,

    /// Low-pass steering factor in the open interval (0, 1).
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Hero diameter at score zero.
    #[serde(default = "default_hero_base_diameter")]
    pub hero_base_diameter: f64,

    /// Score at which the hero's diameter has doubled.
    #[serde(default = "default_hero_growth_divisor")]
    pub hero_growth_divisor: f64,

    /// Extra reach beyond the hero radius within which a token is eaten.
    #[serde(default = "default_consumption_margin")]
    pub consumption_margin: f64,

    /// Width of the band outside the hero radius where tokens are pulled.
    #[serde(default = "default_attraction_range")]
    pub attraction_range: f64,

    /// Pull applied to each attracted token per frame, in pixels.
    #[serde(default = "default_attraction_step")]
    pub attraction_step: f64,

    /// Hero velocity at frame 0.
    #[serde(default = "default_initial_velocity")]
    pub initial_velocity: Vec2,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            min_speed: default_min_speed(),
            score_speed_divisor: default_score_speed_divisor(),
            smoothing: default_smoothing(),
            hero_base_diameter: default_hero_base_diameter(),
            hero_growth_divisor: default_hero_growth_divisor(),
            consumption_margin: default_consumption_margin(),
            attraction_range: default_attraction_range(),
            attraction_step: default_attraction_step(),
            initial_velocity: default_initial_velocity(),
        }
    }
}

impl PursuitConfig {
    /// Validate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("base_speed", self.base_speed),
            ("min_speed", self.min_speed),
            ("score_speed_divisor", self.score_speed_divisor),
            ("hero_base_diameter", self.hero_base_diameter),
            ("hero_growth_divisor", self.hero_growth_divisor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, value, "must be finite and positive"));
            }
        }

        let non_negative = [
            ("consumption_margin", self.consumption_margin),
            ("attraction_range", self.attraction_range),
            ("attraction_step", self.attraction_step),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, value, "must be finite and non-negative"));
            }
        }

        if !self.smoothing.is_finite() || self.smoothing <= 0.0 || self.smoothing >= 1.0 {
            return Err(invalid("smoothing", self.smoothing, "must lie in (0, 1)"));
        }

        if !self.initial_velocity.is_finite() {
            return Err(ConfigError::Invalid {
                reason: "initial_velocity must be finite".to_owned(),
            });
        }
        Ok(())
    }
}

/// Output settings used by the driver binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Playback rate, used to report durations.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Where to write the full timeline as JSON, if anywhere.
    #[serde(default)]
    pub frames_path: Option<PathBuf>,

    /// Wallet history payload to summarize alongside the battle.
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    /// Frames a reward label stays on screen after emission.
    #[serde(default = "default_reward_window")]
    pub reward_window: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            frames_path: None,
            history_path: None,
            reward_window: default_reward_window(),
        }
    }
}

impl OutputConfig {
    /// Validate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `fps` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid {
                reason: "output.fps must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn invalid(name: &str, value: f64, rule: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: format!("pursuit.{name} = {value} {rule}"),
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_base_speed() -> f64 {
    12.0
}

const fn default_min_speed() -> f64 {
    3.0
}

const fn default_score_speed_divisor() -> f64 {
    1500.0
}

const fn default_smoothing() -> f64 {
    0.15
}

const fn default_hero_base_diameter() -> f64 {
    100.0
}

const fn default_hero_growth_divisor() -> f64 {
    4000.0
}

const fn default_consumption_margin() -> f64 {
    10.0
}

const fn default_attraction_range() -> f64 {
    100.0
}

const fn default_attraction_step() -> f64 {
    4.0
}

const fn default_initial_velocity() -> Vec2 {
    Vec2::new(5.0, 5.0)
}

const fn default_fps() -> u32 {
    30
}

const fn default_reward_window() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r"
world:
  agent_count: 6
  token_count: 80
  canvas_width: 1280
  canvas_height: 720
  final_frame: 300
  seed: 7
";

    fn world() -> WorldConfig {
        WorldConfig {
            agent_count: 6,
            token_count: 80,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            final_frame: 300,
            seed: 7,
        }
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let config = SimulationConfig::parse(MINIMAL_YAML).unwrap();
        assert_eq!(config.world.agent_count, 6);
        assert_eq!(config.world.final_frame, 300);
        assert_eq!(config.pursuit, PursuitConfig::default());
        assert_eq!(config.output.fps, 30);
        assert_eq!(config.output.reward_window, 20);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  agent_count: 3
  token_count: 10
  canvas_width: 640
  canvas_height: 480
  final_frame: 90
  seed: 99
pursuit:
  base_speed: 10.0
  smoothing: 0.3
  attraction_range: 50.0
  initial_velocity:
    x: 0.0
    y: 1.0
output:
  fps: 60
  frames_path: out/frames.json
logging:
  level: debug
  format: json
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.pursuit.base_speed, 10.0);
        assert_eq!(config.pursuit.smoothing, 0.3);
        assert_eq!(config.pursuit.attraction_range, 50.0);
        assert_eq!(config.pursuit.min_speed, 3.0);
        assert_eq!(config.pursuit.initial_velocity, Vec2::new(0.0, 1.0));
        assert_eq!(config.output.fps, 60);
        assert_eq!(config.output.frames_path, Some(PathBuf::from("out/frames.json")));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parsed_world_is_exactly_the_yaml() {
        let config = SimulationConfig::parse(MINIMAL_YAML).unwrap();
        assert_eq!(config.world, world());
        assert_eq!(config.world.setup().seed, 7);
        assert_eq!(
            SimulationConfig::parse(MINIMAL_YAML).unwrap().world,
            config.world
        );
    }

    #[test]
    fn world_section_is_required() {
        assert!(SimulationConfig::parse("pursuit:\n  base_speed: 9.0\n").is_err());
    }

    #[test]
    fn world_fields_are_required() {
        let yaml = "world:\n  agent_count: 6\n  token_count: 80\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn pursuit_defaults_match_product_values() {
        let p = PursuitConfig::default();
        assert_eq!(p.base_speed, 12.0);
        assert_eq!(p.min_speed, 3.0);
        assert_eq!(p.score_speed_divisor, 1500.0);
        assert_eq!(p.smoothing, 0.15);
        assert_eq!(p.hero_base_diameter, 100.0);
        assert_eq!(p.hero_growth_divisor, 4000.0);
        assert_eq!(p.consumption_margin, 10.0);
        assert_eq!(p.attraction_range, 100.0);
        assert_eq!(p.attraction_step, 4.0);
        assert_eq!(p.initial_velocity, Vec2::new(5.0, 5.0));
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn zero_final_frame_rejected() {
        let mut w = world();
        w.final_frame = 0;
        assert!(matches!(w.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn oversized_final_frame_rejected() {
        let mut w = world();
        w.final_frame = MAX_FINAL_FRAME + 1;
        assert!(matches!(w.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_counts_rejected_as_world_errors() {
        let mut w = world();
        w.agent_count = 0;
        assert!(matches!(
            w.validate(),
            Err(ConfigError::World { source: WorldError::NoAgents })
        ));
        let mut w = world();
        w.token_count = 0;
        assert!(matches!(
            w.validate(),
            Err(ConfigError::World { source: WorldError::NoTokens })
        ));
    }

    #[test]
    fn non_positive_canvas_rejected() {
        let mut w = world();
        w.canvas_height = 0.0;
        assert!(matches!(
            w.validate(),
            Err(ConfigError::World { source: WorldError::InvalidCanvas { .. } })
        ));
    }

    #[test]
    fn smoothing_must_be_strictly_inside_unit_interval() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let p = PursuitConfig {
                smoothing: bad,
                ..PursuitConfig::default()
            };
            assert!(p.validate().is_err(), "smoothing {bad} accepted");
        }
    }

    #[test]
    fn divisors_must_be_positive() {
        let p = PursuitConfig {
            score_speed_divisor: 0.0,
            ..PursuitConfig::default()
        };
        assert!(p.validate().is_err());
        let p = PursuitConfig {
            hero_growth_divisor: -1.0,
            ..PursuitConfig::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_attraction_rejected() {
        let p = PursuitConfig {
            attraction_step: -4.0,
            ..PursuitConfig::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_fps_rejected() {
        let mut config = SimulationConfig::new(world());
        config.output.fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("aurapnl-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.pursuit, PursuitConfig::default());
            assert_eq!(config.output.reward_window, 20);
        }
    }
}
