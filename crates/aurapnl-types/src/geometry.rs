//! Two-dimensional vector math for positions and velocities.
//!
//! Everything here is a pure function of its inputs. Degenerate input is
//! handled locally: normalizing a zero-length (or non-finite) vector yields
//! [`Vec2::ZERO`], meaning "no direction preference", instead of producing
//! `NaN` that would poison every later frame.
//!
//! Lengths go through `libm` rather than the platform math library so a
//! given seed replays to the same bits on every target.

use core::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point or displacement on the canvas, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec2 {
    /// Horizontal component (grows to the right).
    pub x: f64,
    /// Vertical component (grows downward, screen convention).
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        libm::hypot(self.x, self.y)
    }

    /// Returns `true` if both components are finite.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Replace each non-finite component with zero.
    pub const fn finite_or_zero(self) -> Self {
        Self {
            x: if self.x.is_finite() { self.x } else { 0.0 },
            y: if self.y.is_finite() { self.y } else { 0.0 },
        }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (a - b).length()
}

/// Unit vector pointing the same way as `v`.
///
/// Returns [`Vec2::ZERO`] when `v` has zero or non-finite length.
pub fn normalize(v: Vec2) -> Vec2 {
    let magnitude = v.length();
    if magnitude > 0.0 && magnitude.is_finite() {
        Vec2::new(v.x / magnitude, v.y / magnitude)
    } else {
        Vec2::ZERO
    }
}

/// Unit vector pointing from `from` towards `to`.
///
/// Coincident points have no direction and yield [`Vec2::ZERO`].
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    normalize(to - from)
}

/// The rectangular drawing surface, in pixels, with its origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Canvas {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Canvas {
    /// Create a canvas of the given size. Validity is checked separately
    /// by [`Canvas::is_valid`] so configuration errors can be reported with
    /// the offending values.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are finite and strictly positive.
    pub const fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Map a point onto the canvas torus, wrapping each axis independently
    /// into `[0, extent)`.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(point.x, self.width), wrap_axis(point.y, self.height))
    }
}

/// Wrap one coordinate into `[0, extent)`.
///
/// Uses the truncating remainder and then shifts negative results back
/// into range, so a value of exactly `-extent` lands on `0`.
fn wrap_axis(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 || !extent.is_finite() {
        return 0.0;
    }
    let remainder = value % extent;
    if remainder < 0.0 {
        let shifted = remainder + extent;
        // -0.0 + extent can round up to extent for tiny negative remainders.
        if shifted >= extent { 0.0 } else { shifted }
    } else {
        remainder
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -----------------------------------------------------------------------
    // Vector math
    // -----------------------------------------------------------------------

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!(approx(d, 5.0));
    }

    #[test]
    fn exact_lengths_are_exact() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vec2::new(-50.625, 0.0).length(), 50.625);
        assert_eq!(Vec2::new(5.0, 12.0).length().to_bits(), 13.0_f64.to_bits());
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(12.5, -3.0);
        let b = Vec2::new(-7.0, 40.25);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn normalize_produces_unit_length() {
        let n = normalize(Vec2::new(10.0, -10.0));
        assert!(approx(n.length(), 1.0));
        assert!(n.x > 0.0);
        assert!(n.y < 0.0);
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn normalize_non_finite_vector_is_zero() {
        assert_eq!(normalize(Vec2::new(f64::NAN, 1.0)), Vec2::ZERO);
        assert_eq!(normalize(Vec2::new(f64::INFINITY, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn direction_points_from_source_to_target() {
        let dir = direction(Vec2::new(1.0, 1.0), Vec2::new(1.0, 9.0));
        assert!(approx(dir.x, 0.0));
        assert!(approx(dir.y, 1.0));
    }

    #[test]
    fn direction_between_coincident_points_is_zero() {
        let p = Vec2::new(4.0, 4.0);
        assert_eq!(direction(p, p), Vec2::ZERO);
    }

    #[test]
    fn finite_or_zero_clears_bad_components() {
        let v = Vec2::new(f64::NAN, 2.0).finite_or_zero();
        assert_eq!(v, Vec2::new(0.0, 2.0));
        let v = Vec2::new(1.0, f64::NEG_INFINITY).finite_or_zero();
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    // -----------------------------------------------------------------------
    // Canvas
    // -----------------------------------------------------------------------

    #[test]
    fn canvas_validity() {
        assert!(Canvas::new(1280.0, 720.0).is_valid());
        assert!(!Canvas::new(0.0, 720.0).is_valid());
        assert!(!Canvas::new(1280.0, -1.0).is_valid());
        assert!(!Canvas::new(f64::NAN, 720.0).is_valid());
    }

    #[test]
    fn wrap_keeps_points_inside() {
        let canvas = Canvas::new(100.0, 50.0);
        assert_eq!(canvas.wrap(Vec2::new(130.0, 75.0)), Vec2::new(30.0, 25.0));
        assert_eq!(canvas.wrap(Vec2::new(-10.0, -60.0)), Vec2::new(90.0, 40.0));
        assert_eq!(canvas.wrap(Vec2::new(-100.0, 50.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn wrap_leaves_interior_points_untouched() {
        let canvas = Canvas::new(100.0, 50.0);
        let p = Vec2::new(12.0, 49.5);
        assert_eq!(canvas.wrap(p), p);
    }
}
