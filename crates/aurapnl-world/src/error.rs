//! Error types for the `aurapnl-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`]. Every
//! variant is a configuration problem detected before any entity is
//! created or any frame is stepped, so a failure never leaves a partial
//! world or timeline.

use aurapnl_types::TokenId;

/// Errors that can occur while building the initial population.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The population must contain at least the hero.
    #[error("agent count must be at least 1 (the hero)")]
    NoAgents,

    /// At least one token is required for the hero to pursue.
    #[error("token count must be at least 1")]
    NoTokens,

    /// Canvas dimensions must be finite and strictly positive.
    #[error("invalid canvas {width}x{height}: dimensions must be finite and positive")]
    InvalidCanvas {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// The requested population exceeds the precompute bound.
    #[error("{entity} count {requested} exceeds the maximum of {max}")]
    PopulationTooLarge {
        /// Which population was too large (`"agent"` or `"token"`).
        entity: &'static str,
        /// Requested count.
        requested: u32,
        /// Allowed maximum.
        max: u32,
    },

    /// Token ids must be strictly increasing, which also rules out
    /// duplicates.
    #[error("token {next} follows token {previous}: ids must be strictly increasing")]
    TokensOutOfOrder {
        /// The earlier id in the list.
        previous: TokenId,
        /// The id that is not greater than `previous`.
        next: TokenId,
    },
}
