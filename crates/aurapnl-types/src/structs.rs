//! Core entity structs for the blob battle simulation.
//!
//! Static identity lives in [`Agent`] and [`Token`]; per-frame state lives
//! in the `*Frame` views carried by a [`Snapshot`](crate::Snapshot).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AgentRole;
use crate::geometry::Vec2;
use crate::ids::{AgentId, RewardEventId, TokenId};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    // Each channel is masked to 8 bits before the cast.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// CSS-style `#rrggbb` string.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Immutable identity and starting state of a wallet blob.
///
/// For the hero, `initial_position` and `initial_score` are only the
/// starting point; the pursuit stepper evolves both. Background agents
/// never leave their drift line and keep `initial_score` forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Agent {
    /// Stable identity. The hero is [`AgentId::HERO`].
    pub id: AgentId,
    /// Display label (wallet address or nickname).
    pub label: String,
    /// Fill color.
    pub color: Rgb,
    /// Whether the agent pursues tokens or drifts.
    pub role: AgentRole,
    /// Position at frame 0.
    pub initial_position: Vec2,
    /// Constant per-frame drift velocity (ignored for the hero).
    pub velocity: Vec2,
    /// Profit score at frame 0.
    pub initial_score: f64,
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A consumable reward marker.
///
/// Tokens never change after creation; whether one is still live is
/// tracked by the stepper, and its rendered position is derived per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Token {
    /// Stable identity; lower ids win distance ties.
    pub id: TokenId,
    /// Reward added to the hero's score on consumption. Always positive.
    pub value: f64,
    /// Anchor position the periodic jitter oscillates around.
    pub base_position: Vec2,
    /// Fill color.
    pub color: Rgb,
}

// ---------------------------------------------------------------------------
// RewardEvent
// ---------------------------------------------------------------------------

/// Emitted once when the hero consumes a token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardEvent {
    /// Identity derived from the consumed token.
    pub id: RewardEventId,
    /// The consumed token.
    pub token_id: TokenId,
    /// Where the token was when it was consumed.
    pub position: Vec2,
    /// Reward value credited to the hero.
    pub value: f64,
    /// Frame at which consumption happened.
    pub frame: u32,
}

impl RewardEvent {
    /// Frames elapsed between emission and `frame`, or `None` if `frame`
    /// precedes the emission.
    pub const fn age_at(&self, frame: u32) -> Option<u32> {
        frame.checked_sub(self.frame)
    }
}

// ---------------------------------------------------------------------------
// Per-frame views
// ---------------------------------------------------------------------------

/// An agent as it appears in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentFrame {
    /// Agent identity.
    pub id: AgentId,
    /// Display label.
    pub label: String,
    /// Fill color.
    pub color: Rgb,
    /// Hero or background.
    pub role: AgentRole,
    /// Position in this frame.
    pub position: Vec2,
    /// Score in this frame.
    pub score: f64,
}

/// A live token as it appears in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenFrame {
    /// Token identity.
    pub id: TokenId,
    /// Rendered position (jitter plus attraction).
    pub position: Vec2,
    /// Fill color.
    pub color: Rgb,
    /// Reward value.
    pub value: f64,
}
