//! World initialization and motion models for the `AuraPnL` blob battle.
//!
//! This crate builds the starting population and answers "where is this
//! entity at frame N" for everything that does not depend on the hero.
//!
//! # Modules
//!
//! - [`error`] -- [`WorldError`] for invalid population parameters.
//! - [`initializer`] -- Seeded construction of agents and tokens from a
//!   [`WorldSetup`], with an injectable random source.
//! - [`motion`] -- Closed-form wrap drift for background agents and
//!   periodic jitter for tokens.

pub mod error;
pub mod initializer;
pub mod motion;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use initializer::{
    HERO_START, HERO_START_SCORE, InitialWorld, MAX_AGENTS, MAX_TOKENS, PALETTE, ROSTER,
    WorldSetup, hero, initialize, initialize_seeded,
};
pub use motion::{agent_drift, periodic_jitter, token_jitter, wrap_drift};
