//! Timeline construction: one full pass of the stepper over a fixed run.
//!
//! [`build_timeline`] threads a single [`PursuitState`] through frames
//! `0..=final_frame` in order and freezes the resulting snapshots into a
//! [`Timeline`]. The build either completes or returns an error; a partial
//! timeline is never handed out.

use std::sync::Arc;

use aurapnl_types::{RewardEvent, Snapshot};
use aurapnl_world::{InitialWorld, WorldError};
use serde::Serialize;
use tracing::info;

use crate::accessor::FrameAccessor;
use crate::config::{MAX_FINAL_FRAME, PursuitConfig};
use crate::stepper::{PursuitState, step};

/// Errors that can occur while building a timeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// The run must cover at least one frame after the first.
    #[error("final frame must be at least 1")]
    ZeroFinalFrame,

    /// The run is longer than the precompute pass allows.
    #[error("final frame {requested} exceeds the maximum of {max}")]
    FinalFrameTooLarge {
        /// Requested final frame.
        requested: u32,
        /// Largest accepted final frame.
        max: u32,
    },

    /// The starting population cannot be simulated.
    #[error("invalid world: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Headline numbers for a built timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSummary {
    /// Number of snapshots (`final_frame + 1`).
    pub frames: usize,
    /// Tokens eaten over the whole run.
    pub tokens_consumed: usize,
    /// Tokens still live in the final snapshot.
    pub tokens_remaining: usize,
    /// Frame of the first consumption, if any.
    pub first_consumption: Option<u32>,
    /// Frame of the last consumption, if any.
    pub last_consumption: Option<u32>,
    /// Hero score in the final snapshot.
    pub final_hero_score: f64,
}

/// The immutable, fully-built sequence of snapshots for one run.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// The population the run started from.
    world: Arc<InitialWorld>,
    /// Shared snapshot storage.
    frames: FrameAccessor,
}

impl Timeline {
    /// A read-only handle onto the snapshots, cheap to clone and send to
    /// other threads.
    pub fn accessor(&self) -> FrameAccessor {
        self.frames.clone()
    }

    /// The snapshot for `frame`, holding the last frame past the end.
    pub fn get(&self, frame: u32) -> &Snapshot {
        self.frames.get(frame)
    }

    /// Index of the last simulated frame.
    pub fn final_frame(&self) -> u32 {
        self.frames.final_frame()
    }

    /// Number of snapshots (`final_frame + 1`).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Snapshots in frame order.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> + '_ {
        self.frames.snapshots()
    }

    /// The starting population.
    pub fn world(&self) -> &InitialWorld {
        &self.world
    }

    /// Every reward event of the run, in emission order.
    pub fn rewards(&self) -> &[RewardEvent] {
        &self.frames.last().rewards
    }

    /// Headline numbers for logging and reporting.
    pub fn summary(&self) -> TimelineSummary {
        let last = self.frames.last();
        TimelineSummary {
            frames: self.len(),
            tokens_consumed: last.rewards.len(),
            tokens_remaining: last.tokens.len(),
            first_consumption: last.rewards.first().map(|event| event.frame),
            last_consumption: last.rewards.last().map(|event| event.frame),
            final_hero_score: last.hero_score(),
        }
    }
}

/// Run the stepper over frames `0..=final_frame` and collect the snapshots.
///
/// Strictly sequential: frame `n` depends on the hero state left by frame
/// `n - 1`.
///
/// # Errors
///
/// Returns [`TimelineError`] if `final_frame` is zero or above
/// [`MAX_FINAL_FRAME`], if `world` has no hero or no tokens, or if its
/// token ids are not strictly increasing.
pub fn build_timeline(
    world: InitialWorld,
    params: &PursuitConfig,
    final_frame: u32,
) -> Result<Timeline, TimelineError> {
    if final_frame == 0 {
        return Err(TimelineError::ZeroFinalFrame);
    }
    if final_frame > MAX_FINAL_FRAME {
        return Err(TimelineError::FinalFrameTooLarge {
            requested: final_frame,
            max: MAX_FINAL_FRAME,
        });
    }
    let hero = world.hero().ok_or(WorldError::NoAgents)?;
    if world.tokens.is_empty() {
        return Err(WorldError::NoTokens.into());
    }
    world.check_token_order()?;

    info!(
        final_frame,
        agents = world.agents.len(),
        tokens = world.tokens.len(),
        "Timeline build started"
    );

    let mut state = PursuitState::new(hero, params);
    let mut leading = Vec::with_capacity(usize::try_from(final_frame).unwrap_or(0));
    for frame in 0..final_frame {
        leading.push(step(&world, params, &mut state, frame).snapshot);
    }
    let last = step(&world, params, &mut state, final_frame).snapshot;

    let timeline = Timeline {
        world: Arc::new(world),
        frames: FrameAccessor::new(leading.into(), Arc::new(last)),
    };

    let summary = timeline.summary();
    info!(
        frames = summary.frames,
        consumed = summary.tokens_consumed,
        remaining = summary.tokens_remaining,
        final_score = summary.final_hero_score,
        "Timeline build completed"
    );

    Ok(timeline)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use aurapnl_types::{Canvas, TokenId, Vec2};
    use aurapnl_world::{WorldSetup, hero, initialize_seeded};

    use super::*;

    fn setup(seed: u64) -> WorldSetup {
        WorldSetup {
            agent_count: 4,
            token_count: 30,
            canvas: Canvas::new(1280.0, 720.0),
            seed,
        }
    }

    fn seeded_world(seed: u64) -> InitialWorld {
        initialize_seeded(&setup(seed)).unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn timeline_has_one_snapshot_per_frame() {
        let timeline = build_timeline(seeded_world(1), &PursuitConfig::default(), 120).unwrap();
        assert_eq!(timeline.len(), 121);
        assert_eq!(timeline.final_frame(), 120);
        for (index, snapshot) in timeline.snapshots().enumerate() {
            assert_eq!(usize::try_from(snapshot.frame).unwrap(), index);
        }
    }

    #[test]
    fn zero_final_frame_is_rejected() {
        let err = build_timeline(seeded_world(1), &PursuitConfig::default(), 0).unwrap_err();
        assert_eq!(err, TimelineError::ZeroFinalFrame);
    }

    #[test]
    fn oversized_final_frame_is_rejected() {
        let err = build_timeline(
            seeded_world(1),
            &PursuitConfig::default(),
            MAX_FINAL_FRAME + 1,
        )
        .unwrap_err();
        assert!(matches!(err, TimelineError::FinalFrameTooLarge { .. }));
    }

    #[test]
    fn world_without_hero_is_rejected() {
        let mut world = seeded_world(1);
        world.agents.clear();
        let err = build_timeline(world, &PursuitConfig::default(), 10).unwrap_err();
        assert_eq!(
            err,
            TimelineError::World {
                source: WorldError::NoAgents
            }
        );
    }

    #[test]
    fn world_without_tokens_is_rejected() {
        let mut world = seeded_world(1);
        world.tokens.clear();
        let err = build_timeline(world, &PursuitConfig::default(), 10).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::World {
                source: WorldError::NoTokens
            }
        ));
    }

    #[test]
    fn unsorted_tokens_are_rejected() {
        let mut world = seeded_world(1);
        world.tokens.swap(0, 1);
        let err = build_timeline(world, &PursuitConfig::default(), 10).unwrap_err();
        assert_eq!(
            err,
            TimelineError::World {
                source: WorldError::TokensOutOfOrder {
                    previous: TokenId::new(1),
                    next: TokenId::new(0),
                }
            }
        );
    }

    #[test]
    fn duplicate_token_ids_are_rejected() {
        let mut world = seeded_world(1);
        let copy = world.tokens[0];
        world.tokens.insert(1, copy);
        let err = build_timeline(world, &PursuitConfig::default(), 10).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::World {
                source: WorldError::TokensOutOfOrder { .. }
            }
        ));
    }

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------

    #[test]
    fn summary_matches_final_snapshot() {
        let timeline = build_timeline(seeded_world(7), &PursuitConfig::default(), 600).unwrap();
        let summary = timeline.summary();
        let last = timeline.get(600);

        assert_eq!(summary.frames, 601);
        assert_eq!(summary.tokens_consumed, last.rewards.len());
        assert_eq!(summary.tokens_remaining, last.tokens.len());
        assert_eq!(summary.tokens_consumed + summary.tokens_remaining, 30);
        assert_eq!(summary.final_hero_score, last.hero_score());
        assert_eq!(timeline.rewards(), last.rewards.as_slice());
        if let (Some(first), Some(last_frame)) =
            (summary.first_consumption, summary.last_consumption)
        {
            assert!(first <= last_frame);
        }
    }

    #[test]
    fn summary_with_no_consumption() {
        let world = InitialWorld {
            canvas: Canvas::new(4000.0, 4000.0),
            agents: vec![hero()],
            tokens: vec![aurapnl_types::Token {
                id: TokenId::new(0),
                value: 250.0,
                base_position: Vec2::new(3900.0, 3900.0),
                color: aurapnl_world::PALETTE[0],
            }],
        };
        let timeline = build_timeline(world, &PursuitConfig::default(), 5).unwrap();
        let summary = timeline.summary();
        assert_eq!(summary.tokens_consumed, 0);
        assert_eq!(summary.first_consumption, None);
        assert_eq!(summary.final_hero_score, 50.0);
    }

    #[test]
    fn world_is_kept_with_timeline() {
        let world = seeded_world(3);
        let timeline = build_timeline(world.clone(), &PursuitConfig::default(), 10).unwrap();
        assert_eq!(timeline.world(), &world);
    }
}
