//! Render output.

use roost_types::FrameSnapshot;

use crate::simulation::Simulation;

impl Simulation {
    /// Everything a renderer needs to draw the current state.
    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.clock.tick(),
            agents: self.roster.iter().map(roost_agents::Agent::snapshot).collect(),
            eggs: self.habitat.eggs.snapshots(),
            feed: self.habitat.feed.snapshots(),
            pointer: self.habitat.pointer.snapshot(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roost_agents::Tunables;
    use roost_types::{FeedLevel, Vec2};
    use roost_world::Viewport;

    use super::*;

    #[test]
    fn frame_reflects_the_board() {
        let mut sim = Simulation::new(
            Viewport::new(800.0, 600.0).unwrap(),
            Tunables::default(),
            SmallRng::seed_from_u64(1),
        );
        sim.spawn_adults(2);
        sim.habitat_mut().eggs.lay(Vec2::new(100.0, 100.0));
        sim.place_feed(Vec2::new(700.0, 500.0));
        sim.take_feed_from_bag();

        let frame = sim.frame();
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.agents.len(), 2);
        assert_eq!(frame.eggs.len(), 1);
        assert_eq!(frame.feed.len(), 1);
        assert_eq!(frame.feed.first().unwrap().level, FeedLevel::Full);
        assert!(frame.pointer.carrying_food);
    }

    #[test]
    fn frame_serializes_to_json() {
        let mut sim = Simulation::new(
            Viewport::new(800.0, 600.0).unwrap(),
            Tunables::default(),
            SmallRng::seed_from_u64(2),
        );
        sim.spawn_adults(1);
        let json = serde_json::to_string(&sim.frame()).unwrap();
        assert!(json.contains("\"agents\""));
        assert!(json.contains("\"pointer\""));
    }
}
