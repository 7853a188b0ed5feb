//! The tick pass.
//!
//! One call to [`Simulation::tick`] runs these steps in order:
//!
//! 1. **Clock** -- advance the tick counter and virtual time.
//! 2. **Tasks** -- fire every deferred task due inside the new window, each
//!    at its own due time, so follow-up delays chain exactly.
//! 3. **Agents** -- visit the roster in insertion order. Each agent advances
//!    its animation, resolves its sitting timer, then decides.
//!
//! Resolving the sitting timer before the decision means an agent whose
//! egg just finished incubating is free to walk away on the same tick.

use roost_agents::{ParentLink, ParentView};
use roost_types::AgentKind;
use serde::Serialize;
use tracing::info;

use crate::clock::{ClockError, sanitize_elapsed};
use crate::simulation::Simulation;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Virtual milliseconds this tick covered.
    pub elapsed_ms: f64,
    /// Virtual time at the end of the tick.
    pub now_ms: f64,
    /// Adults in the roster.
    pub adults: usize,
    /// Juveniles in the roster.
    pub juveniles: usize,
    /// Eggs on the board.
    pub eggs: usize,
    /// Feed piles on the board.
    pub feed_piles: usize,
    /// Deferred tasks fired.
    pub tasks_fired: u64,
    /// Juveniles hatched.
    pub hatched: u64,
}

impl Simulation {
    /// Run one tick covering `elapsed_ms` of virtual time.
    ///
    /// Negative or non-finite `elapsed_ms` counts as zero.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] if the tick counter would overflow.
    pub fn tick(&mut self, elapsed_ms: f64) -> Result<TickSummary, TickError> {
        let elapsed = sanitize_elapsed(elapsed_ms);
        let tick = self.clock.advance(elapsed)?;
        let horizon = self.clock.elapsed_ms();

        // --- Deferred tasks ---
        let mut tasks_fired: u64 = 0;
        let mut hatched: u64 = 0;
        while let Some(task) = self.habitat.scheduler.pop_due(horizon) {
            tasks_fired = tasks_fired.saturating_add(1);
            if self.dispatch(task).is_some() {
                hatched = hatched.saturating_add(1);
            }
        }
        self.habitat.scheduler.advance_to(horizon);

        // --- Agents ---
        for index in 0..self.roster.len() {
            let link = self.parent_link(index);
            let Some(agent) = self.roster.get_mut(index) else {
                continue;
            };
            agent.advance_animation(elapsed);
            agent.update_sitting(elapsed, &mut self.habitat);
            agent.decide(elapsed, link, &mut self.habitat);
        }

        let summary = self.summarize(tick, elapsed, tasks_fired, hatched);
        // checked_rem is None for an interval of 0, which disables summaries.
        if tick.checked_rem(self.summary_interval_ticks) == Some(0) {
            info!(
                tick,
                now_ms = summary.now_ms,
                adults = summary.adults,
                juveniles = summary.juveniles,
                eggs = summary.eggs,
                feed_piles = summary.feed_piles,
                hatched_total = self.hatched_total,
                "Tick summary"
            );
        }
        Ok(summary)
    }

    /// Resolve the parent link of the agent at `index` against the roster.
    fn parent_link(&self, index: usize) -> ParentLink {
        let Some(parent) = self.roster.get(index).and_then(|agent| agent.parent()) else {
            return ParentLink::Unbound;
        };
        self.roster
            .iter()
            .find(|agent| agent.id == parent && agent.is_adult())
            .map_or(ParentLink::Lost, |agent| {
                ParentLink::Present(ParentView::of(agent))
            })
    }

    fn summarize(&self, tick: u64, elapsed_ms: f64, tasks_fired: u64, hatched: u64) -> TickSummary {
        let adults = self
            .roster
            .iter()
            .filter(|agent| agent.kind == AgentKind::Adult)
            .count();
        TickSummary {
            tick,
            elapsed_ms,
            now_ms: self.clock.elapsed_ms(),
            adults,
            juveniles: self.roster.len().saturating_sub(adults),
            eggs: self.habitat.eggs.len(),
            feed_piles: self.habitat.feed.len(),
            tasks_fired,
            hatched,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roost_agents::{Agent, Tunables};
    use roost_types::{AgentId, Vec2};
    use roost_world::Viewport;

    use super::*;

    fn simulation(tunables: Tunables) -> Simulation {
        Simulation::new(
            Viewport::new(1000.0, 800.0).unwrap(),
            tunables,
            SmallRng::seed_from_u64(17),
        )
    }

    #[test]
    fn clock_and_scheduler_advance_together() {
        let mut sim = simulation(Tunables::default());
        let summary = sim.tick(16.0).unwrap();
        assert_eq!(summary.tick, 1);
        assert!((summary.now_ms - 16.0).abs() < f64::EPSILON);
        assert!((sim.habitat().now_ms() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_elapsed_counts_as_zero() {
        let mut sim = simulation(Tunables::default());
        sim.tick(-5.0).unwrap();
        sim.tick(f64::NAN).unwrap();
        assert_eq!(sim.tick_count(), 2);
        assert!(sim.now_ms().abs() < f64::EPSILON);
    }

    #[test]
    fn summary_counts_the_roster() {
        let mut sim = simulation(Tunables::default());
        sim.spawn_adults(3);
        sim.insert_agent(Agent::new_juvenile(
            Vec2::new(50.0, 50.0),
            Vec2::ZERO,
            None,
            16.0,
        ));
        let summary = sim.tick(16.0).unwrap();
        assert_eq!(summary.adults, 3);
        assert_eq!(summary.juveniles, 1);
    }

    #[test]
    fn parent_link_resolution() {
        let mut sim = simulation(Tunables::default());
        sim.spawn_adults(1);
        let parent = sim.agents().first().unwrap().id;
        sim.insert_agent(Agent::new_juvenile(Vec2::ZERO, Vec2::ZERO, Some(parent), 16.0));
        sim.insert_agent(Agent::new_juvenile(
            Vec2::ZERO,
            Vec2::ZERO,
            Some(AgentId::new()),
            16.0,
        ));

        assert_eq!(sim.parent_link(0), ParentLink::Unbound);
        assert!(matches!(sim.parent_link(1), ParentLink::Present(_)));
        assert_eq!(sim.parent_link(2), ParentLink::Lost);
    }

    #[test]
    fn a_long_tick_fires_chained_tasks_in_order() {
        let mut tunables = Tunables::default();
        tunables.adult.direction_change_chance = 0.0;
        tunables.adult.peck_chance = 0.0;
        tunables.adult.idle_chance = 0.0;
        tunables.adult.egg_lay_chance = 0.0;
        let mut sim = simulation(tunables);
        let egg = sim.habitat_mut().eggs.lay(Vec2::new(400.0, 400.0));
        sim.dispatch(roost_agents::Task::BeginHatching { egg });

        // One 5 s step covers all three hatch phases and the shell delay.
        let summary = sim.tick(5_000.0).unwrap();
        assert_eq!(summary.hatched, 1);
        assert_eq!(summary.tasks_fired, 4);
        assert_eq!(summary.juveniles, 1);
        assert!(sim.habitat().eggs.get(egg).is_none());
    }
}
