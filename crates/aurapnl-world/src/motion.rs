//! Stateless motion models.
//!
//! Both models are closed-form functions of `(entity, frame)`: nothing is
//! integrated step by step, so any frame can be evaluated directly and the
//! result is independent of which frames were evaluated before it.
//!
//! - **Wrap drift** moves background agents at constant velocity across a
//!   toroidal canvas.
//! - **Periodic jitter** bobs tokens around their anchor, phase-shifted by
//!   token id so neighbours do not move in lockstep. The trigonometry
//!   comes from `libm`, so jitter is bit-identical across platforms.

use aurapnl_types::{Agent, Canvas, Token, TokenId, Vec2};

/// Peak jitter displacement per axis, in pixels.
pub const JITTER_AMPLITUDE: f64 = 5.0;

/// Frames per radian of horizontal jitter.
const JITTER_PERIOD_X: f64 = 20.0;

/// Frames per radian of vertical jitter.
const JITTER_PERIOD_Y: f64 = 25.0;

/// Horizontal phase offset per token id, in radians.
const JITTER_PHASE_X: f64 = 0.5;

/// Vertical phase offset per token id, in radians.
const JITTER_PHASE_Y: f64 = 0.7;

/// Position at `frame` of an entity drifting from `initial` at `velocity`,
/// wrapped onto the canvas torus on each axis independently.
///
/// `position = (initial + velocity * frame) mod bounds`, with negative
/// remainders mapped back into `[0, bounds)`.
pub fn wrap_drift(initial: Vec2, velocity: Vec2, frame: u32, canvas: &Canvas) -> Vec2 {
    canvas.wrap(initial + velocity * f64::from(frame))
}

/// Drift position of a background agent at `frame`.
pub fn agent_drift(agent: &Agent, frame: u32, canvas: &Canvas) -> Vec2 {
    wrap_drift(agent.initial_position, agent.velocity, frame, canvas)
}

/// Anchor `base` displaced by a small sinusoid at `frame`, phase-shifted by
/// `id`.
pub fn periodic_jitter(base: Vec2, id: TokenId, frame: u32) -> Vec2 {
    let t = f64::from(frame);
    let phase = f64::from(id.into_inner());
    let dx = libm::sin(libm::fma(JITTER_PHASE_X, phase, t / JITTER_PERIOD_X)) * JITTER_AMPLITUDE;
    let dy = libm::cos(libm::fma(JITTER_PHASE_Y, phase, t / JITTER_PERIOD_Y)) * JITTER_AMPLITUDE;
    Vec2::new(base.x + dx, base.y + dy)
}

/// Jittered position of a token at `frame`.
pub fn token_jitter(token: &Token, frame: u32) -> Vec2 {
    periodic_jitter(token.base_position, token.id, frame)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use aurapnl_types::{AgentId, AgentRole, Rgb, distance};

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn canvas() -> Canvas {
        Canvas::new(1280.0, 720.0)
    }

    fn drifter(initial: Vec2, velocity: Vec2) -> Agent {
        Agent {
            id: AgentId::new(1),
            label: String::from("drifter"),
            color: Rgb::new(0, 0, 0),
            role: AgentRole::Background,
            initial_position: initial,
            velocity,
            initial_score: 1500.0,
        }
    }

    // -----------------------------------------------------------------------
    // Wrap drift
    // -----------------------------------------------------------------------

    #[test]
    fn drift_at_frame_zero_is_initial_position() {
        let p = Vec2::new(400.0, 200.0);
        assert_eq!(wrap_drift(p, Vec2::new(1.2, -0.7), 0, &canvas()), p);
    }

    #[test]
    fn drift_moves_linearly_before_wrapping() {
        let p = wrap_drift(Vec2::new(100.0, 100.0), Vec2::new(1.5, -1.0), 10, &canvas());
        assert!((p.x - 115.0).abs() < EPSILON);
        assert!((p.y - 90.0).abs() < EPSILON);
    }

    #[test]
    fn drift_wraps_past_right_and_bottom_edges() {
        let p = wrap_drift(Vec2::new(1270.0, 715.0), Vec2::new(1.5, 1.5), 10, &canvas());
        assert!((p.x - 5.0).abs() < EPSILON);
        assert!((p.y - 10.0).abs() < EPSILON);
    }

    #[test]
    fn drift_wraps_negative_into_positive_range() {
        let p = wrap_drift(Vec2::new(5.0, 5.0), Vec2::new(-1.0, -1.0), 10, &canvas());
        assert!((p.x - 1275.0).abs() < EPSILON);
        assert!((p.y - 715.0).abs() < EPSILON);
    }

    #[test]
    fn drift_stays_on_canvas_for_long_runs() {
        let agent = drifter(Vec2::new(640.0, 360.0), Vec2::new(-1.49, 1.37));
        for frame in (0..10_000).step_by(37) {
            let p = agent_drift(&agent, frame, &canvas());
            assert!(p.x >= 0.0 && p.x < 1280.0, "x out of range at {frame}: {}", p.x);
            assert!(p.y >= 0.0 && p.y < 720.0, "y out of range at {frame}: {}", p.y);
        }
    }

    // -----------------------------------------------------------------------
    // Periodic jitter
    // -----------------------------------------------------------------------

    #[test]
    fn jitter_stays_within_amplitude() {
        let base = Vec2::new(300.0, 300.0);
        for id in 0..20 {
            for frame in 0..400 {
                let p = periodic_jitter(base, TokenId::new(id), frame);
                assert!((p.x - base.x).abs() <= JITTER_AMPLITUDE + EPSILON);
                assert!((p.y - base.y).abs() <= JITTER_AMPLITUDE + EPSILON);
            }
        }
    }

    #[test]
    fn jitter_is_not_cumulative() {
        let base = Vec2::new(50.0, 60.0);
        let id = TokenId::new(3);
        let direct = periodic_jitter(base, id, 123);
        let _ = periodic_jitter(base, id, 122);
        assert_eq!(periodic_jitter(base, id, 123), direct);
    }

    #[test]
    fn jitter_phase_depends_on_id() {
        let base = Vec2::new(50.0, 60.0);
        let a = periodic_jitter(base, TokenId::new(0), 10);
        let b = periodic_jitter(base, TokenId::new(1), 10);
        assert!(distance(a, b) > EPSILON);
    }

    #[test]
    fn jitter_at_frame_zero_for_token_zero() {
        // sin(0) = 0 and cos(0) = 1.
        let p = periodic_jitter(Vec2::new(10.0, 10.0), TokenId::new(0), 0);
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!((p.y - 15.0).abs() < EPSILON);
    }

    #[test]
    fn jitter_bits_come_from_portable_trig() {
        let base = Vec2::new(640.0, 360.0);
        let p = periodic_jitter(base, TokenId::new(3), 47);
        let x_angle = libm::fma(JITTER_PHASE_X, 3.0, 47.0 / JITTER_PERIOD_X);
        let y_angle = libm::fma(JITTER_PHASE_Y, 3.0, 47.0 / JITTER_PERIOD_Y);
        let dx = libm::sin(x_angle) * JITTER_AMPLITUDE;
        let dy = libm::cos(y_angle) * JITTER_AMPLITUDE;
        assert_eq!(p.x.to_bits(), (base.x + dx).to_bits());
        assert_eq!(p.y.to_bits(), (base.y + dy).to_bits());
    }
}
