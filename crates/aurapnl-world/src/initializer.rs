//! Seeded construction of the starting population.
//!
//! The hero always starts from the same fixed position and score. Every
//! other quantity (background positions and velocities, token positions,
//! values, and colors) is drawn from an injected random source, so the
//! same seed always yields the same world.
//!
//! # Draw order
//!
//! Reproducibility depends on the order of draws, which is part of the
//! contract:
//!
//! 1. For each background agent in id order: position x, position y,
//!    velocity x, velocity y.
//! 2. For each token in id order: value, position x, position y, palette
//!    index.

use aurapnl_types::{Agent, AgentId, AgentRole, Canvas, Rgb, Token, TokenId, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;

/// Upper bound on agents (hero included) in a single precompute pass.
pub const MAX_AGENTS: u32 = 64;

/// Upper bound on tokens in a single precompute pass.
pub const MAX_TOKENS: u32 = 4096;

/// Where the hero starts.
pub const HERO_START: Vec2 = Vec2::new(100.0, 100.0);

/// The hero's score at frame 0.
pub const HERO_START_SCORE: f64 = 50.0;

/// Score of the first background agent.
const BACKGROUND_BASE_SCORE: f64 = 1500.0;

/// Score increment per background agent index.
const BACKGROUND_SCORE_STEP: f64 = 800.0;

/// Background drift speed bound per axis, in pixels per frame.
const MAX_DRIFT_SPEED: f64 = 1.5;

/// Smallest token reward.
const TOKEN_MIN_VALUE: f64 = 100.0;

/// Width of the token reward range above [`TOKEN_MIN_VALUE`].
const TOKEN_VALUE_SPREAD: f64 = 400.0;

/// Agent and token colors: blue, red, green, amber, violet, pink.
pub const PALETTE: [Rgb; 6] = [
    Rgb::from_hex(0x003b_82f6),
    Rgb::from_hex(0x00ef_4444),
    Rgb::from_hex(0x0010_b981),
    Rgb::from_hex(0x00f5_9e0b),
    Rgb::from_hex(0x008b_5cf6),
    Rgb::from_hex(0x00ec_4899),
];

/// Built-in wallet labels. The hero takes the first one.
pub const ROSTER: [&str; 6] = [
    "0x71C...A3e",
    "Whale_Master",
    "Degenerate_Joe",
    "Alpha_Hunter",
    "Smart_Money",
    "0xAbc...123",
];

/// Parameters for building the starting population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSetup {
    /// Total agents, hero included.
    pub agent_count: u32,
    /// Number of reward tokens.
    pub token_count: u32,
    /// Drawing surface; background agents wrap around it.
    pub canvas: Canvas,
    /// Seed for [`initialize_seeded`].
    pub seed: u64,
}

impl WorldSetup {
    /// Check every field before any entity is created.
    ///
    /// # Errors
    ///
    /// Returns the first [`WorldError`] found.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.agent_count == 0 {
            return Err(WorldError::NoAgents);
        }
        if self.token_count == 0 {
            return Err(WorldError::NoTokens);
        }
        if !self.canvas.is_valid() {
            return Err(WorldError::InvalidCanvas {
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        if self.agent_count > MAX_AGENTS {
            return Err(WorldError::PopulationTooLarge {
                entity: "agent",
                requested: self.agent_count,
                max: MAX_AGENTS,
            });
        }
        if self.token_count > MAX_TOKENS {
            return Err(WorldError::PopulationTooLarge {
                entity: "token",
                requested: self.token_count,
                max: MAX_TOKENS,
            });
        }
        Ok(())
    }
}

/// The starting population: agents ordered by id (hero first) and tokens
/// ordered by id.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialWorld {
    /// Drawing surface the population lives on.
    pub canvas: Canvas,
    /// All agents, hero at index 0.
    pub agents: Vec<Agent>,
    /// All tokens, all live at frame 0.
    pub tokens: Vec<Token>,
}

impl InitialWorld {
    /// The hero agent, if present.
    pub fn hero(&self) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.role.is_hero())
    }

    /// Check that token ids are strictly increasing.
    ///
    /// Target acquisition and consumption key on token ids, so a
    /// hand-built world with duplicate ids would credit one token twice.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TokensOutOfOrder`] for the first pair of
    /// neighbouring tokens whose ids do not increase.
    pub fn check_token_order(&self) -> Result<(), WorldError> {
        self.tokens
            .windows(2)
            .filter_map(|pair| match pair {
                [previous, next] => Some((previous.id, next.id)),
                _ => None,
            })
            .find(|(previous, next)| next <= previous)
            .map_or(Ok(()), |(previous, next)| {
                Err(WorldError::TokensOutOfOrder { previous, next })
            })
    }

    /// All agents that follow the drift motion model.
    pub fn background_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter().filter(|agent| !agent.role.is_hero())
    }
}

/// The hero as it stands at frame 0.
pub fn hero() -> Agent {
    Agent {
        id: AgentId::HERO,
        label: roster_label(0),
        color: palette_color(0),
        role: AgentRole::Hero,
        initial_position: HERO_START,
        velocity: Vec2::ZERO,
        initial_score: HERO_START_SCORE,
    }
}

/// Build the starting population from an injected random source.
///
/// Pure construction: the only effect is advancing `rng`.
///
/// # Errors
///
/// Returns [`WorldError`] if `setup` fails [`WorldSetup::validate`].
pub fn initialize<R: Rng + ?Sized>(
    setup: &WorldSetup,
    rng: &mut R,
) -> Result<InitialWorld, WorldError> {
    setup.validate()?;
    let canvas = setup.canvas;

    let mut agents = Vec::with_capacity(usize::try_from(setup.agent_count).unwrap_or(0));
    agents.push(hero());
    for index in 1..setup.agent_count {
        agents.push(background_agent(index, &canvas, rng));
    }

    let tokens: Vec<Token> = (0..setup.token_count)
        .map(|index| token(index, &canvas, rng))
        .collect();

    debug!(
        agents = agents.len(),
        tokens = tokens.len(),
        width = canvas.width,
        height = canvas.height,
        "Initial world built"
    );

    Ok(InitialWorld {
        canvas,
        agents,
        tokens,
    })
}

/// Build the starting population from `setup.seed`.
///
/// Seeds a [`ChaCha12Rng`], whose output stream is fixed for a given seed
/// regardless of platform or `rand` release.
///
/// # Errors
///
/// Returns [`WorldError`] if `setup` fails [`WorldSetup::validate`].
pub fn initialize_seeded(setup: &WorldSetup) -> Result<InitialWorld, WorldError> {
    let mut rng = ChaCha12Rng::seed_from_u64(setup.seed);
    initialize(setup, &mut rng)
}

fn background_agent<R: Rng + ?Sized>(index: u32, canvas: &Canvas, rng: &mut R) -> Agent {
    let position = random_point(canvas, rng);
    let velocity = Vec2::new(
        rng.random_range(-MAX_DRIFT_SPEED..MAX_DRIFT_SPEED),
        rng.random_range(-MAX_DRIFT_SPEED..MAX_DRIFT_SPEED),
    );
    let slot = usize::try_from(index).unwrap_or(0);
    Agent {
        id: AgentId::new(index),
        label: roster_label(slot),
        color: palette_color(slot),
        role: AgentRole::Background,
        initial_position: position,
        velocity,
        initial_score: BACKGROUND_SCORE_STEP.mul_add(f64::from(index), BACKGROUND_BASE_SCORE),
    }
}

fn token<R: Rng + ?Sized>(index: u32, canvas: &Canvas, rng: &mut R) -> Token {
    let value = libm::fma(rng.random::<f64>(), TOKEN_VALUE_SPREAD, TOKEN_MIN_VALUE);
    let base_position = random_point(canvas, rng);
    let color = palette_color(rng.random_range(0..PALETTE.len()));
    Token {
        id: TokenId::new(index),
        value,
        base_position,
        color,
    }
}

fn random_point<R: Rng + ?Sized>(canvas: &Canvas, rng: &mut R) -> Vec2 {
    let x = rng.random::<f64>() * canvas.width;
    let y = rng.random::<f64>() * canvas.height;
    Vec2::new(x, y)
}

/// Palette entry for `slot`, cycling past the end.
fn palette_color(slot: usize) -> Rgb {
    slot.checked_rem(PALETTE.len())
        .and_then(|i| PALETTE.get(i))
        .copied()
        .unwrap_or(Rgb::new(0xff, 0xff, 0xff))
}

/// Roster label for `slot`; later laps get a `#n` suffix.
fn roster_label(slot: usize) -> String {
    let name = slot
        .checked_rem(ROSTER.len())
        .and_then(|i| ROSTER.get(i))
        .copied()
        .unwrap_or("wallet");
    let lap = slot.checked_div(ROSTER.len()).unwrap_or(0);
    if lap == 0 {
        name.to_owned()
    } else {
        format!("{name} #{}", lap.saturating_add(1))
    }
}
