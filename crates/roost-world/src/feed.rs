//! Feed registry: placement, consumption, and proximity lookup of feed piles.
//!
//! Piles only ever shrink. A pile whose amount reaches zero is removed in
//! the same call that emptied it and its id is never reused, so any agent
//! still holding that id finds nothing on its next lookup.

use roost_types::{FeedId, FeedLevel, FeedSnapshot, Vec2};
use serde::Deserialize;
use tracing::debug;

use crate::error::WorldError;
use crate::viewport::Viewport;

/// Tunables for feed piles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedTunables {
    /// Sprite size in pixels; placement centres the sprite on the pointer.
    pub size: f64,
    /// Amount a freshly placed pile holds.
    pub initial_amount: u32,
    /// Amount removed by one peck.
    pub consume_amount: u32,
    /// Notification radius as a fraction of the smaller viewport dimension.
    pub notify_radius: f64,
    /// Remaining fraction above which a pile shows as full.
    pub full_threshold: f64,
    /// Remaining fraction above which a pile shows as half.
    pub half_threshold: f64,
}

impl Default for FeedTunables {
    fn default() -> Self {
        Self {
            size: 16.0,
            initial_amount: 100,
            consume_amount: 10,
            notify_radius: 0.5,
            full_threshold: 0.66,
            half_threshold: 0.33,
        }
    }
}

impl FeedTunables {
    /// Check every field is inside its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidTunable`] naming the first bad field.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.size.is_finite() && self.size >= 0.0) {
            return Err(WorldError::InvalidTunable {
                name: "size",
                reason: format!("must be a finite non-negative number, got {}", self.size),
            });
        }
        if self.initial_amount == 0 {
            return Err(WorldError::InvalidTunable {
                name: "initial_amount",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.consume_amount == 0 {
            return Err(WorldError::InvalidTunable {
                name: "consume_amount",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(self.notify_radius.is_finite() && self.notify_radius >= 0.0) {
            return Err(WorldError::InvalidTunable {
                name: "notify_radius",
                reason: format!("must be a finite non-negative fraction, got {}", self.notify_radius),
            });
        }
        if !(0.0..=1.0).contains(&self.half_threshold)
            || !(self.half_threshold..=1.0).contains(&self.full_threshold)
        {
            return Err(WorldError::InvalidTunable {
                name: "full_threshold",
                reason: "thresholds must satisfy 0 <= half <= full <= 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// A depletable pile of feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPile {
    /// Pile identity.
    pub id: FeedId,
    /// Top-left corner of the pile sprite.
    pub position: Vec2,
    /// Remaining amount (never increases).
    pub amount: u32,
    /// Amount the pile was placed with.
    pub initial_amount: u32,
}

impl FeedPile {
    /// Remaining fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.initial_amount == 0 {
            return 0.0;
        }
        f64::from(self.amount) / f64::from(self.initial_amount)
    }

    /// Sprite bucket for the remaining amount.
    pub fn level(&self, tunables: &FeedTunables) -> FeedLevel {
        let fraction = self.fraction();
        if fraction > tunables.full_threshold {
            FeedLevel::Full
        } else if fraction > tunables.half_threshold {
            FeedLevel::Half
        } else {
            FeedLevel::Low
        }
    }
}

/// Owns the set of live feed piles.
#[derive(Debug, Clone, Default)]
pub struct FeedRegistry {
    tunables: FeedTunables,
    piles: Vec<FeedPile>,
}

impl FeedRegistry {
    /// Create an empty registry.
    pub const fn new(tunables: FeedTunables) -> Self {
        Self {
            tunables,
            piles: Vec::new(),
        }
    }

    /// The tunables this registry was built with.
    pub const fn tunables(&self) -> &FeedTunables {
        &self.tunables
    }

    /// Place a full pile centred on `point` and return its id.
    ///
    /// Notifying nearby agents is the caller's job, since the registry does
    /// not own the roster; see [`FeedRegistry::notify_radius`].
    pub fn place_feed(&mut self, point: Vec2) -> FeedId {
        let half = self.tunables.size / 2.0;
        let pile = FeedPile {
            id: FeedId::new(),
            position: Vec2::new(point.x - half, point.y - half),
            amount: self.tunables.initial_amount,
            initial_amount: self.tunables.initial_amount,
        };
        let id = pile.id;
        debug!(feed_id = %id, x = pile.position.x, y = pile.position.y, "Feed placed");
        self.piles.push(pile);
        id
    }

    /// Remove `amount` from the named pile.
    ///
    /// Returns `true` if this call emptied the pile, which is then removed.
    /// Unknown ids are a no-op returning `false`.
    pub fn consume_feed(&mut self, id: FeedId, amount: u32) -> bool {
        let Some(pile) = self.piles.iter_mut().find(|pile| pile.id == id) else {
            return false;
        };
        pile.amount = pile.amount.saturating_sub(amount);
        if pile.amount > 0 {
            return false;
        }
        self.piles.retain(|pile| pile.id != id);
        debug!(feed_id = %id, "Feed pile depleted");
        true
    }

    /// [`consume_feed`](Self::consume_feed) with the configured peck amount.
    pub fn consume(&mut self, id: FeedId) -> bool {
        self.consume_feed(id, self.tunables.consume_amount)
    }

    /// Look up a live pile.
    pub fn get(&self, id: FeedId) -> Option<&FeedPile> {
        self.piles.iter().find(|pile| pile.id == id)
    }

    /// Whether the pile is still live.
    pub fn contains(&self, id: FeedId) -> bool {
        self.get(id).is_some()
    }

    /// Live piles in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &FeedPile> {
        self.piles.iter()
    }

    /// Number of live piles.
    pub fn len(&self) -> usize {
        self.piles.len()
    }

    /// Whether no pile is live.
    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// The closest live pile within `radius` of `from`, if any.
    pub fn nearest_within(&self, from: Vec2, radius: f64) -> Option<FeedId> {
        self.piles
            .iter()
            .map(|pile| (pile.id, from.distance_to(pile.position)))
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Radius within which agents are told about a newly placed pile.
    pub fn notify_radius(&self, viewport: &Viewport) -> f64 {
        viewport.min_dimension() * self.tunables.notify_radius
    }

    /// Render view of every live pile.
    pub fn snapshots(&self) -> Vec<FeedSnapshot> {
        self.piles
            .iter()
            .map(|pile| FeedSnapshot {
                id: pile.id,
                position: pile.position,
                amount: pile.amount,
                initial_amount: pile.initial_amount,
                level: pile.level(&self.tunables),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry() -> FeedRegistry {
        FeedRegistry::new(FeedTunables::default())
    }

    #[test]
    fn placement_centres_pile_on_pointer() {
        let mut feed = registry();
        let id = feed.place_feed(Vec2::new(500.0, 500.0));
        let pile = feed.get(id).unwrap();
        assert_eq!(pile.position, Vec2::new(492.0, 492.0));
        assert_eq!(pile.amount, 100);
        assert_eq!(pile.initial_amount, 100);
    }

    #[test]
    fn one_peck_leaves_ninety() {
        let mut feed = registry();
        let id = feed.place_feed(Vec2::new(500.0, 500.0));
        assert!(!feed.consume(id));
        assert_eq!(feed.get(id).map(|p| p.amount), Some(90));
    }

    #[test]
    fn ten_pecks_remove_the_pile_exactly_once() {
        let mut feed = registry();
        let id = feed.place_feed(Vec2::new(500.0, 500.0));
        let mut previous = 100;
        for peck in 1..=10 {
            let depleted = feed.consume(id);
            assert_eq!(depleted, peck == 10);
            if let Some(pile) = feed.get(id) {
                assert!(pile.amount < previous);
                previous = pile.amount;
            }
        }
        assert!(!feed.contains(id));
        assert!(feed.is_empty());
        // Already gone: further pecks are no-ops.
        assert!(!feed.consume(id));
    }

    #[test]
    fn oversized_bite_empties_without_underflow() {
        let mut feed = registry();
        let id = feed.place_feed(Vec2::new(10.0, 10.0));
        assert!(feed.consume_feed(id, 1_000));
        assert!(!feed.contains(id));
    }

    #[test]
    fn unknown_pile_is_noop() {
        let mut feed = registry();
        let kept = feed.place_feed(Vec2::new(10.0, 10.0));
        assert!(!feed.consume_feed(FeedId::new(), 10));
        assert_eq!(feed.get(kept).map(|p| p.amount), Some(100));
    }

    #[test]
    fn nearest_within_picks_closest_in_radius() {
        let mut feed = registry();
        let far = feed.place_feed(Vec2::new(300.0, 300.0));
        let near = feed.place_feed(Vec2::new(120.0, 100.0));
        let origin = Vec2::new(100.0, 100.0);
        assert_eq!(feed.nearest_within(origin, 500.0), Some(near));
        assert_eq!(feed.nearest_within(origin, 5.0), None);
        assert!(feed.contains(far));
    }

    #[test]
    fn levels_follow_thresholds() {
        let mut feed = registry();
        let id = feed.place_feed(Vec2::new(50.0, 50.0));
        let level = |feed: &FeedRegistry| feed.get(id).map(|p| p.level(feed.tunables()));
        assert_eq!(level(&feed), Some(FeedLevel::Full));
        for _ in 0..4 {
            feed.consume(id);
        }
        assert_eq!(level(&feed), Some(FeedLevel::Half));
        for _ in 0..4 {
            feed.consume(id);
        }
        assert_eq!(level(&feed), Some(FeedLevel::Low));
    }

    #[test]
    fn notify_radius_uses_smaller_dimension() {
        let feed = registry();
        let viewport = Viewport::new(1000.0, 600.0).unwrap();
        assert!((feed.notify_radius(&viewport) - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tunables_validation() {
        assert!(FeedTunables::default().validate().is_ok());
        let bad = FeedTunables {
            consume_amount: 0,
            ..FeedTunables::default()
        };
        assert!(bad.validate().is_err());
        let inverted = FeedTunables {
            full_threshold: 0.2,
            half_threshold: 0.5,
            ..FeedTunables::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn tunables_deserialize_partially() {
        let tunables: FeedTunables =
            serde_json::from_str(r#"{"initial_amount": 50}"#).unwrap();
        assert_eq!(tunables.initial_amount, 50);
        assert_eq!(tunables.consume_amount, 10);
    }
}
