//! Continuous 2D geometry used by snapshots and metric computations.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Lengths below this are treated as zero when normalizing or projecting.
pub const EPSILON: f32 = 1e-6;

/// Position, velocity, or direction in arena units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +x).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Returns the unit vector, or [`Vec2::ZERO`] for degenerate input.
    pub fn normalized_or_zero(self) -> Self {
        let len = self.length();
        if len <= EPSILON || !len.is_finite() {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Cosine of the angle between `self` and `other`.
    ///
    /// Zero-length inputs contribute `0.0` rather than NaN.
    pub fn cos_angle(self, other: Self) -> f32 {
        let a = self.normalized_or_zero();
        let b = other.normalized_or_zero();
        a.dot(b).clamp(-1.0, 1.0)
    }

    /// Shortest distance from `self` to the segment `a..b`.
    pub fn segment_distance(self, a: Self, b: Self) -> f32 {
        let ab = b - a;
        let len_sq = ab.length_squared();
        if len_sq <= EPSILON {
            return self.distance(a);
        }
        let t = ((self - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.distance(a + ab * t)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_zero_vector_yields_zero() {
        assert_eq!(Vec2::ZERO.normalized_or_zero(), Vec2::ZERO);
        assert_eq!(Vec2::ZERO.cos_angle(Vec2::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        assert!((Vec2::new(5.0, 3.0).segment_distance(a, b) - 3.0).abs() < 1e-5);
        assert!((Vec2::new(-4.0, 3.0).segment_distance(a, b) - 5.0).abs() < 1e-5);
        assert!((Vec2::new(13.0, 4.0).segment_distance(a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_segment_measures_to_point() {
        let p = Vec2::new(3.0, 4.0);
        assert!((p.segment_distance(Vec2::ZERO, Vec2::ZERO) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn angle_helpers_agree() {
        let east = Vec2::from_angle(0.0);
        let north = Vec2::from_angle(std::f32::consts::FRAC_PI_2);
        assert!(east.cos_angle(north).abs() < 1e-5);
        assert!((east.cross(north) - 1.0).abs() < 1e-5);
    }
}
