//! Minimal 2D vector used for positions and velocities.
//!
//! Positions are viewport pixels with the origin at the top-left corner;
//! velocities are pixels per tick.

use core::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point or displacement in viewport space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec2 {
    /// Horizontal component (pixels).
    pub x: f64,
    /// Vertical component (pixels, growing downward).
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Build a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Sum of the absolute components, used as a cheap "is moving" test.
    pub fn manhattan(self) -> f64 {
        self.x.abs() + self.y.abs()
    }

    /// Unit vector pointing from `self` toward `target` scaled by `speed`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn toward(self, target: Self, speed: f64) -> Option<Self> {
        let delta = target - self;
        let distance = delta.length();
        if distance > 0.0 {
            Some(delta * (speed / distance))
        } else {
            None
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
        assert!((b.distance_to(a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn toward_scales_to_speed() {
        let step = Vec2::new(10.0, 10.0)
            .toward(Vec2::new(10.0, 30.0), 2.0)
            .unwrap_or(Vec2::ZERO);
        assert!(step.x.abs() < 1e-9);
        assert!((step.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn toward_same_point_is_none() {
        let p = Vec2::new(7.0, 7.0);
        assert!(p.toward(p, 1.0).is_none());
    }
}
