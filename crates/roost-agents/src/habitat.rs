//! The world context every agent reads and mutates during a tick.

use rand::rngs::SmallRng;
use rand::Rng;
use roost_world::{FeedRegistry, PointerState, Scheduler, Viewport};

use crate::config::Tunables;
use crate::egg::EggRoster;
use crate::task::Task;

/// Shared world state: pointer, bounds, feed, eggs, timers, and dice.
///
/// Agents never own the habitat. The simulation lends it to each agent in
/// turn. Fields are public so callers can borrow disjoint parts at once
/// (an egg from `eggs` and the `scheduler`, for example).
#[derive(Debug)]
pub struct Habitat {
    /// Visible area.
    pub viewport: Viewport,
    /// Pointer position and carried feed.
    pub pointer: PointerState,
    /// Live feed piles.
    pub feed: FeedRegistry,
    /// Live eggs.
    pub eggs: EggRoster,
    /// Deferred transitions in virtual time.
    pub scheduler: Scheduler<Task>,
    /// Random source for every behavior roll.
    pub rng: SmallRng,
    /// Behavior parameters.
    pub tunables: Tunables,
}

impl Habitat {
    /// Build an empty habitat.
    pub fn new(viewport: Viewport, tunables: Tunables, rng: SmallRng) -> Self {
        Self {
            viewport,
            pointer: PointerState::new(),
            feed: FeedRegistry::new(tunables.feed.clone()),
            eggs: EggRoster::new(),
            scheduler: Scheduler::new(),
            rng,
            tunables,
        }
    }

    /// Current virtual time in milliseconds.
    pub const fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// `true` with probability `chance`.
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.random::<f64>() < chance
    }

    /// A value spread evenly over `[-spread / 2, spread / 2)`.
    pub fn jitter(&mut self, spread: f64) -> f64 {
        (self.rng.random::<f64>() - 0.5) * spread
    }

    /// A value spread evenly over `[min, max)`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (max - min).mul_add(self.rng.random::<f64>(), min)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn habitat() -> Habitat {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        Habitat::new(viewport, Tunables::default(), SmallRng::seed_from_u64(7))
    }

    #[test]
    fn pinned_rolls_are_deterministic() {
        let mut habitat = habitat();
        for _ in 0..100 {
            assert!(!habitat.roll(0.0));
            assert!(habitat.roll(1.0));
        }
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut habitat = habitat();
        for _ in 0..1000 {
            let value = habitat.jitter(30.0);
            assert!((-15.0..15.0).contains(&value));
            let value = habitat.uniform(1500.0, 3500.0);
            assert!((1500.0..3500.0).contains(&value));
        }
    }
}
