//! Enumeration types for the blob battle simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How an agent moves through the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// The single pursuing agent whose position and score evolve through
    /// the pursuit stepper.
    Hero,
    /// A competitor that drifts at constant velocity with a fixed score.
    Background,
}

impl AgentRole {
    /// Returns `true` for [`AgentRole::Hero`].
    pub const fn is_hero(self) -> bool {
        matches!(self, Self::Hero)
    }
}
