//! The immutable per-frame state handed to the renderer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{AgentId, TokenId};
use crate::structs::{AgentFrame, RewardEvent, TokenFrame};

/// Complete simulation state for one discrete frame.
///
/// Snapshots are produced once by the timeline builder and never mutated.
/// `rewards` holds every event emitted up to and including `frame`, in
/// emission order, so renderers can key transient effects off
/// `frame - event.frame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// The frame this snapshot represents.
    pub frame: u32,
    /// Every agent, ordered by id. The hero is first.
    pub agents: Vec<AgentFrame>,
    /// Live tokens only, ordered by id.
    pub tokens: Vec<TokenFrame>,
    /// Reward events emitted so far.
    pub rewards: Vec<RewardEvent>,
}

impl Snapshot {
    /// The hero's state in this frame.
    pub fn hero(&self) -> Option<&AgentFrame> {
        self.agents.iter().find(|agent| agent.role.is_hero())
    }

    /// The hero's score in this frame, or `0.0` if no hero is present.
    pub fn hero_score(&self) -> f64 {
        self.hero().map_or(0.0, |hero| hero.score)
    }

    /// Look up an agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&AgentFrame> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    /// Returns `true` if the token is still live in this frame.
    pub fn is_token_live(&self, id: TokenId) -> bool {
        self.tokens.iter().any(|token| token.id == id)
    }

    /// Agents ranked by score, highest first. Equal scores keep id order.
    pub fn leaderboard(&self) -> Vec<&AgentFrame> {
        let mut ranked: Vec<&AgentFrame> = self.agents.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        ranked
    }

    /// Reward events whose age in this frame lies in `0..=window`.
    pub fn active_rewards(&self, window: u32) -> impl Iterator<Item = &RewardEvent> + '_ {
        let frame = self.frame;
        self.rewards
            .iter()
            .filter(move |event| event.age_at(frame).is_some_and(|age| age <= window))
    }

    /// Sum of all reward values emitted so far.
    pub fn total_rewarded(&self) -> f64 {
        self.rewards.iter().map(|event| event.value).sum()
    }
}
