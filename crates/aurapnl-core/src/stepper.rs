//! Pursuit and consumption: the one stateful step of the simulation.
//!
//! Each call to [`step`] advances the hero by one frame and emits the
//! [`Snapshot`] for that frame. Unlike the motion models, a step depends
//! on everything before it: the hero's position, velocity, and score, and
//! the set of consumed tokens all carry forward in [`PursuitState`].
//!
//! Per frame, in order:
//!
//! 1. Position every live token with periodic jitter.
//! 2. Pick the nearest live token. Equal distances go to the lowest id.
//!    With no live tokens left the hero holds position and score.
//! 3. Cap speed at `max(min_speed, base_speed - score / score_speed_divisor)`.
//! 4. Low-pass the velocity towards the target and move.
//! 5. Consume the target if it was within `radius + consumption_margin`
//!    of the hero at the start of the frame.
//! 6. Pull the remaining live tokens lying in `[radius, radius + range)`
//!    of the hero one `attraction_step` towards it.
//! 7. Emit the snapshot.

use std::collections::BTreeSet;

use aurapnl_types::{
    Agent, AgentFrame, RewardEvent, RewardEventId, Snapshot, Token, TokenFrame, TokenId, Vec2,
    direction, distance,
};
use aurapnl_world::{InitialWorld, agent_drift, token_jitter};
use tracing::{debug, warn};

use crate::config::PursuitConfig;

/// The hero's evolving state between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitState {
    /// Current hero position.
    position: Vec2,
    /// Current hero velocity, in pixels per frame.
    velocity: Vec2,
    /// Current hero score.
    score: f64,
    /// Tokens eaten so far. Never shrinks.
    consumed: BTreeSet<TokenId>,
    /// Reward events in emission order.
    rewards: Vec<RewardEvent>,
}

impl PursuitState {
    /// Start state for `hero` at frame 0.
    pub const fn new(hero: &Agent, params: &PursuitConfig) -> Self {
        Self {
            position: hero.initial_position,
            velocity: params.initial_velocity,
            score: hero.initial_score,
            consumed: BTreeSet::new(),
            rewards: Vec::new(),
        }
    }

    /// Current hero position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current hero velocity.
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current hero score.
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Returns `true` once `token` has been eaten.
    pub fn is_consumed(&self, token: TokenId) -> bool {
        self.consumed.contains(&token)
    }

    /// Number of tokens eaten so far.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// Reward events emitted so far, oldest first.
    pub fn rewards(&self) -> &[RewardEvent] {
        &self.rewards
    }
}

/// Result of one [`step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// The frame's snapshot.
    pub snapshot: Snapshot,
    /// The reward emitted this frame, if a token was eaten.
    pub reward: Option<RewardEvent>,
}

/// A live token and where it is drawn this frame.
#[derive(Debug, Clone, Copy)]
struct LiveToken<'a> {
    token: &'a Token,
    position: Vec2,
}

/// Hero radius for a given score: the diameter grows linearly with score.
pub const fn hero_radius(score: f64, params: &PursuitConfig) -> f64 {
    params.hero_base_diameter * (1.0 + score / params.hero_growth_divisor) / 2.0
}

/// Hero speed cap for a given score, never below `min_speed`.
pub const fn max_speed(score: f64, params: &PursuitConfig) -> f64 {
    (params.base_speed - score / params.score_speed_divisor).max(params.min_speed)
}

/// One low-pass steering update:
/// `velocity + (heading * speed - velocity) * smoothing`.
///
/// Non-finite components are clamped to zero.
pub fn steer(velocity: Vec2, heading: Vec2, speed: f64, smoothing: f64) -> Vec2 {
    let desired = heading * speed;
    let next = velocity + (desired - velocity) * smoothing;
    if !next.is_finite() {
        warn!(
            vx = next.x,
            vy = next.y,
            "Non-finite hero velocity, clamping to zero"
        );
    }
    next.finite_or_zero()
}

/// Index and distance of the live token nearest to `hero`.
///
/// Equal distances go to the lowest token id, whatever order `live` is in.
fn nearest(hero: Vec2, live: &[LiveToken<'_>]) -> Option<(usize, f64)> {
    live.iter()
        .enumerate()
        .map(|(index, candidate)| (index, distance(hero, candidate.position), candidate.token.id))
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.2.cmp(&b.2)))
        .map(|(index, d, _)| (index, d))
}

/// Advance the hero by one frame and emit that frame's snapshot.
///
/// Must be called with strictly increasing `frame` values starting at 0.
pub fn step(
    world: &InitialWorld,
    params: &PursuitConfig,
    state: &mut PursuitState,
    frame: u32,
) -> StepOutcome {
    let radius = hero_radius(state.score, params);

    // 1. Jittered positions of live tokens.
    let mut live: Vec<LiveToken<'_>> = world
        .tokens
        .iter()
        .filter(|token| !state.consumed.contains(&token.id))
        .map(|token| LiveToken {
            token,
            position: token_jitter(token, frame),
        })
        .collect();

    let mut reward = None;

    // 2. Target acquisition.
    if let Some((target_index, target_distance)) = nearest(state.position, &live) {
        if let Some(target) = live.get(target_index).copied() {
            // 3-4. Speed cap, steering, and movement.
            let heading = direction(state.position, target.position);
            let speed = max_speed(state.score, params);
            state.velocity = steer(state.velocity, heading, speed, params.smoothing);
            state.position += state.velocity;

            // 5. Consumption, measured from where the hero started the frame.
            if target_distance < radius + params.consumption_margin {
                let event = consume(state, target, frame);
                live.remove(target_index);
                reward = Some(event);
            }

            // 6. Attraction field.
            attract(state.position, radius, params, &mut live);
        }
    }

    // 7. Snapshot.
    let snapshot = Snapshot {
        frame,
        agents: agent_frames(world, state, frame),
        tokens: live
            .iter()
            .map(|entry| TokenFrame {
                id: entry.token.id,
                position: entry.position,
                color: entry.token.color,
                value: entry.token.value,
            })
            .collect(),
        rewards: state.rewards.clone(),
    };

    StepOutcome { snapshot, reward }
}

/// Mark `target` eaten, credit the hero, and record the reward.
fn consume(state: &mut PursuitState, target: LiveToken<'_>, frame: u32) -> RewardEvent {
    let event = RewardEvent {
        id: RewardEventId::from(target.token.id),
        token_id: target.token.id,
        position: target.position,
        value: target.token.value,
        frame,
    };
    state.consumed.insert(target.token.id);
    state.score += target.token.value;
    state.rewards.push(event);
    debug!(
        frame,
        token = %target.token.id,
        value = target.token.value,
        score = state.score,
        "Token consumed"
    );
    event
}

/// Nudge live tokens in the band `[radius, radius + range)` towards the hero.
fn attract(hero: Vec2, radius: f64, params: &PursuitConfig, live: &mut [LiveToken<'_>]) {
    let outer = radius + params.attraction_range;
    for entry in live.iter_mut() {
        let d = distance(hero, entry.position);
        if d >= radius && d < outer {
            entry.position += direction(entry.position, hero) * params.attraction_step;
        }
    }
}

/// Every agent's frame view: the hero from `state`, the rest from drift.
fn agent_frames(world: &InitialWorld, state: &PursuitState, frame: u32) -> Vec<AgentFrame> {
    world
        .agents
        .iter()
        .map(|agent| {
            let (position, score) = if agent.role.is_hero() {
                (state.position, state.score)
            } else {
                (agent_drift(agent, frame, &world.canvas), agent.initial_score)
            };
            AgentFrame {
                id: agent.id,
                label: agent.label.clone(),
                color: agent.color,
                role: agent.role,
                position,
                score,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::suboptimal_flops
)]
mod tests {
    use aurapnl_types::{Canvas, Rgb};
    use aurapnl_world::initializer;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn token_at(id: u32, x: f64, y: f64, value: f64) -> Token {
        Token {
            id: TokenId::new(id),
            value,
            base_position: Vec2::new(x, y),
            color: Rgb::new(0x10, 0xb9, 0x81),
        }
    }

    fn world_with(tokens: Vec<Token>) -> InitialWorld {
        InitialWorld {
            canvas: Canvas::new(1280.0, 720.0),
            agents: vec![initializer::hero()],
            tokens,
        }
    }

    fn start(world: &InitialWorld, params: &PursuitConfig) -> PursuitState {
        PursuitState::new(world.hero().unwrap(), params)
    }

    // -----------------------------------------------------------------------
    // Pure helpers
    // -----------------------------------------------------------------------

    #[test]
    fn radius_grows_with_score() {
        let p = PursuitConfig::default();
        assert_eq!(hero_radius(0.0, &p), 50.0);
        assert_eq!(hero_radius(4000.0, &p), 100.0);
        assert!(hero_radius(50.0, &p) > hero_radius(0.0, &p));
    }

    #[test]
    fn speed_decreases_with_score_and_is_floored() {
        let p = PursuitConfig::default();
        assert_eq!(max_speed(0.0, &p), 12.0);
        assert_eq!(max_speed(1500.0, &p), 11.0);
        assert_eq!(max_speed(13_500.0, &p), 3.0);
        assert_eq!(max_speed(1_000_000.0, &p), 3.0);
    }

    #[test]
    fn steer_is_an_exponential_low_pass() {
        let v = steer(Vec2::new(5.0, 5.0), Vec2::new(1.0, 0.0), 12.0, 0.15);
        assert!((v.x - (5.0 + (12.0 - 5.0) * 0.15)).abs() < EPSILON);
        assert!((v.y - (5.0 - 5.0 * 0.15)).abs() < EPSILON);
    }

    #[test]
    fn steer_clamps_non_finite_velocity() {
        let v = steer(Vec2::new(f64::MAX, 1.0), Vec2::new(-1.0, 0.0), f64::MAX, 0.5);
        assert!(v.is_finite());
        assert_eq!(v.x, 0.0);
        let v = steer(Vec2::new(f64::NAN, 2.0), Vec2::ZERO, 3.0, 0.5);
        assert_eq!(v.x, 0.0);
        assert!((v.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn nearest_breaks_ties_by_lowest_id() {
        let a = token_at(0, 0.0, 0.0, 1.0);
        let b = token_at(1, 0.0, 0.0, 1.0);
        let live = [
            LiveToken {
                token: &a,
                position: Vec2::new(10.0, 0.0),
            },
            LiveToken {
                token: &b,
                position: Vec2::new(-10.0, 0.0),
            },
        ];
        assert_eq!(nearest(Vec2::ZERO, &live), Some((0, 10.0)));
    }

    #[test]
    fn nearest_tie_break_ignores_list_order() {
        let a = token_at(0, 0.0, 0.0, 1.0);
        let b = token_at(1, 0.0, 0.0, 1.0);
        let live = [
            LiveToken {
                token: &b,
                position: Vec2::new(0.0, 10.0),
            },
            LiveToken {
                token: &a,
                position: Vec2::new(0.0, -10.0),
            },
        ];
        assert_eq!(nearest(Vec2::ZERO, &live), Some((1, 10.0)));
    }

    #[test]
    fn nearest_prefers_strictly_closer_over_lower_id() {
        let a = token_at(0, 0.0, 0.0, 1.0);
        let b = token_at(1, 0.0, 0.0, 1.0);
        let live = [
            LiveToken {
                token: &a,
                position: Vec2::new(11.0, 0.0),
            },
            LiveToken {
                token: &b,
                position: Vec2::new(0.0, 10.0),
            },
        ];
        assert_eq!(nearest(Vec2::ZERO, &live), Some((1, 10.0)));
    }

    #[test]
    fn nearest_of_nothing_is_none() {
        assert_eq!(nearest(Vec2::ZERO, &[]), None);
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    #[test]
    fn token_under_hero_is_consumed_on_first_frame() {
        let world = world_with(vec![token_at(0, 100.0, 100.0, 250.0)]);
        let params = PursuitConfig::default();
        let mut state = start(&world, &params);

        let outcome = step(&world, &params, &mut state, 0);
        let reward = outcome.reward.unwrap();
        assert_eq!(reward.token_id, TokenId::new(0));
        assert_eq!(reward.frame, 0);
        assert_eq!(reward.value, 250.0);
        assert_eq!(state.score(), 300.0);
        assert!(outcome.snapshot.tokens.is_empty());
        assert_eq!(outcome.snapshot.rewards.len(), 1);
        assert_eq!(outcome.snapshot.hero_score(), 300.0);
    }

    #[test]
    fn hero_holds_once_everything_is_eaten() {
        let world = world_with(vec![token_at(0, 100.0, 100.0, 250.0)]);
        let params = PursuitConfig::default();
        let mut state = start(&world, &params);
        let _ = step(&world, &params, &mut state, 0);
        let held = state.position();

        for frame in 1..10 {
            let outcome = step(&world, &params, &mut state, frame);
            assert!(outcome.reward.is_none());
            assert_eq!(outcome.snapshot.hero().unwrap().position, held);
            assert_eq!(outcome.snapshot.hero_score(), 300.0);
        }
    }

    #[test]
    fn hero_moves_by_smoothed_velocity_towards_target() {
        let world = world_with(vec![token_at(0, 1000.0, 100.0, 100.0)]);
        let params = PursuitConfig::default();
        let mut state = start(&world, &params);

        let target = token_jitter(&world.tokens[0], 0);
        let heading = direction(Vec2::new(100.0, 100.0), target);
        let expected_v = steer(Vec2::new(5.0, 5.0), heading, max_speed(50.0, &params), 0.15);

        let outcome = step(&world, &params, &mut state, 0);
        assert!(outcome.reward.is_none());
        assert_eq!(state.velocity(), expected_v);
        assert_eq!(state.position(), Vec2::new(100.0, 100.0) + expected_v);
    }

    #[test]
    fn attraction_pulls_band_tokens_only() {
        // Hero radius at score 50 is 50.625; the band is [50.625, 150.625).
        let world = world_with(vec![
            token_at(0, 700.0, 100.0, 100.0),  // far, unaffected
            token_at(1, 100.0, 230.0, 100.0),  // inside the band
            token_at(2, 100.0, 600.0, 100.0),  // outside the band
        ]);
        let params = PursuitConfig {
            initial_velocity: Vec2::ZERO,
            ..PursuitConfig::default()
        };
        let mut state = start(&world, &params);
        let outcome = step(&world, &params, &mut state, 0);
        let hero = state.position();

        // Token 1 is the target and sits inside the band; tokens 0 and 2
        // are far outside it.
        let t0 = outcome.snapshot.tokens.iter().find(|t| t.id.into_inner() == 0).unwrap();
        let t2 = outcome.snapshot.tokens.iter().find(|t| t.id.into_inner() == 2).unwrap();
        assert_eq!(t0.position, token_jitter(&world.tokens[0], 0));
        assert_eq!(t2.position, token_jitter(&world.tokens[2], 0));

        let t1 = outcome.snapshot.tokens.iter().find(|t| t.id.into_inner() == 1).unwrap();
        let jittered = token_jitter(&world.tokens[1], 0);
        let pulled = jittered + direction(jittered, hero) * params.attraction_step;
        assert!((t1.position.x - pulled.x).abs() < EPSILON);
        assert!((t1.position.y - pulled.y).abs() < EPSILON);
        assert!(distance(t1.position, hero) < distance(jittered, hero));
    }

    #[test]
    fn attraction_band_is_closed_inside_and_open_outside() {
        let params = PursuitConfig::default();
        let radius = hero_radius(50.0, &params);
        let outer = radius + params.attraction_range;
        let inner_edge = token_at(0, 0.0, 0.0, 1.0);
        let outer_edge = token_at(1, 0.0, 0.0, 1.0);
        let mut live = [
            LiveToken {
                token: &inner_edge,
                position: Vec2::new(radius, 0.0),
            },
            LiveToken {
                token: &outer_edge,
                position: Vec2::new(outer, 0.0),
            },
        ];

        attract(Vec2::ZERO, radius, &params, &mut live);

        // Exactly on the hero's rim: pulled one step inward.
        assert!((live[0].position.x - (radius - params.attraction_step)).abs() < EPSILON);
        assert_eq!(live[0].position.y, 0.0);
        // Exactly on the outer edge: untouched.
        assert_eq!(live[1].position, Vec2::new(outer, 0.0));
    }

    #[test]
    fn attraction_is_not_cumulative() {
        let world = world_with(vec![token_at(0, 100.0, 230.0, 100.0)]);
        let params = PursuitConfig::default();
        let mut state = start(&world, &params);
        let _ = step(&world, &params, &mut state, 0);
        let second = step(&world, &params, &mut state, 1);

        // Frame 1 starts again from the jittered anchor, not from the
        // position pulled in frame 0.
        let hero = state.position();
        let jittered = token_jitter(&world.tokens[0], 1);
        let expected = jittered + direction(jittered, hero) * params.attraction_step;
        let drawn = second.snapshot.tokens[0].position;
        assert!((drawn.x - expected.x).abs() < EPSILON);
        assert!((drawn.y - expected.y).abs() < EPSILON);
    }

    #[test]
    fn snapshot_lists_background_agents_at_drift_positions() {
        let setup = aurapnl_world::WorldSetup {
            agent_count: 3,
            token_count: 5,
            canvas: Canvas::new(1280.0, 720.0),
            seed: 1,
        };
        let world = aurapnl_world::initialize_seeded(&setup).unwrap();
        let params = PursuitConfig::default();
        let mut state = start(&world, &params);
        for frame in 0..5 {
            let outcome = step(&world, &params, &mut state, frame);
            assert_eq!(outcome.snapshot.frame, frame);
            assert_eq!(outcome.snapshot.agents.len(), 3);
            for agent in world.background_agents() {
                let view = outcome.snapshot.agent(agent.id).unwrap();
                assert_eq!(view.position, agent_drift(agent, frame, &world.canvas));
                assert_eq!(view.score, agent.initial_score);
            }
        }
    }
}
