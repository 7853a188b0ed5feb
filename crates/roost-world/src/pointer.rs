//! Pointer state reported by the input layer.

use roost_types::{PointerSnapshot, Vec2};

/// Last known pointer position and whether it carries a handful of feed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    position: Vec2,
    carrying_food: bool,
}

impl PointerState {
    /// Create a pointer at the origin with empty hands.
    pub const fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            carrying_food: false,
        }
    }

    /// Record a pointer move.
    pub const fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Last known pointer position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the pointer currently carries food.
    pub const fn has_food(&self) -> bool {
        self.carrying_food
    }

    /// Pick up a handful of feed from the bag.
    pub const fn pick_up_food(&mut self) {
        self.carrying_food = true;
    }

    /// Let go of the carried feed. Returns whether anything was carried.
    pub const fn drop_food(&mut self) -> bool {
        let was_carrying = self.carrying_food;
        self.carrying_food = false;
        was_carrying
    }

    /// Render view of the pointer.
    pub const fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            position: self.position,
            carrying_food: self.carrying_food,
        }
    }
}
