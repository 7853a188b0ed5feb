//! Viewport bounds, clamping, and elastic edge reflection.
//!
//! Agents are positioned by the top-left corner of their sprite, so the
//! legal range for an agent of size `s` is `[0, width - s] x [0, height - s]`.
//! When the viewport is smaller than the sprite, the range collapses to 0.

use roost_types::Vec2;

use crate::error::WorldError;

/// Which axes bounced during a [`Viewport::reflect`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    /// The horizontal velocity was reflected.
    pub x: bool,
    /// The vertical velocity was reflected.
    pub y: bool,
}

/// The visible area agents live in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Create a viewport of the given size in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] if either dimension is not a
    /// finite positive number.
    pub fn new(width: f64, height: f64) -> Result<Self, WorldError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The smaller of the two dimensions; radii are expressed as fractions of it.
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Largest legal x for a sprite of `size`.
    pub fn max_x(&self, size: f64) -> f64 {
        (self.width - size).max(0.0)
    }

    /// Largest legal y for a sprite of `size`.
    pub fn max_y(&self, size: f64) -> f64 {
        (self.height - size).max(0.0)
    }

    /// Clamp a position into the legal range for a sprite of `size`.
    pub fn clamp(&self, position: Vec2, size: f64) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.max_x(size)),
            position.y.clamp(0.0, self.max_y(size)),
        )
    }

    /// Whether a sprite of `size` at `position` lies fully inside.
    pub fn contains(&self, position: Vec2, size: f64) -> bool {
        (0.0..=self.max_x(size)).contains(&position.x)
            && (0.0..=self.max_y(size)).contains(&position.y)
    }

    /// Elastic wall: if the position touches or crosses an edge, point the
    /// matching velocity component back inside and clamp the position.
    pub fn reflect(&self, position: &mut Vec2, velocity: &mut Vec2, size: f64) -> Bounce {
        let mut bounce = Bounce { x: false, y: false };
        let max_x = self.max_x(size);
        let max_y = self.max_y(size);

        if position.x <= 0.0 {
            velocity.x = velocity.x.abs();
            bounce.x = true;
        } else if position.x >= max_x {
            velocity.x = -velocity.x.abs();
            bounce.x = true;
        }
        if position.y <= 0.0 {
            velocity.y = velocity.y.abs();
            bounce.y = true;
        } else if position.y >= max_y {
            velocity.y = -velocity.y.abs();
            bounce.y = true;
        }

        position.x = position.x.clamp(0.0, max_x);
        position.y = position.y.clamp(0.0, max_y);
        bounce
    }
}
