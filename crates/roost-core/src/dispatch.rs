//! Firing deferred tasks.
//!
//! Every task names its target by id. A target that has left the roster, or
//! an agent whose timer epoch has moved on, turns the task into a no-op.

use roost_agents::{Agent, Habitat, Hatchling, Task};
use roost_types::{AgentId, EggState};
use tracing::debug;

use crate::simulation::Simulation;

impl Simulation {
    /// Run one due task. Returns the id of a juvenile it hatched, if any.
    pub(crate) fn dispatch(&mut self, task: Task) -> Option<AgentId> {
        debug!(task = task.label(), due_ms = self.habitat.scheduler.now_ms(), "Task due");
        match task {
            Task::ResumeAfterPeck { agent, epoch } => {
                if let Some((agent, _)) = self.agent_with_habitat(agent) {
                    agent.finish_ground_peck(epoch);
                }
            }
            Task::FinishFeedPeck {
                agent,
                epoch,
                feed_gone,
            } => {
                if let Some((agent, habitat)) = self.agent_with_habitat(agent) {
                    agent.finish_feed_peck(epoch, feed_gone, habitat);
                }
            }
            Task::FinishLaying { agent, epoch } => {
                if let Some((agent, habitat)) = self.agent_with_habitat(agent) {
                    if let Some(egg) = agent.finish_laying(epoch, habitat) {
                        debug!(agent_id = %agent.id, egg_id = %egg, "Laying finished");
                    }
                }
            }
            Task::SettleAfterSit { agent } => {
                if let Some((agent, habitat)) = self.agent_with_habitat(agent) {
                    agent.settle_after_sit(habitat);
                }
            }
            Task::RideTimeout { agent, epoch } => {
                if let Some((agent, habitat)) = self.agent_with_habitat(agent) {
                    agent.ride_timeout(epoch, habitat);
                }
            }
            Task::BeginHatching { egg } => {
                let Habitat {
                    eggs,
                    scheduler,
                    tunables,
                    ..
                } = &mut self.habitat;
                eggs.begin_hatching(egg, &tunables.egg, scheduler);
            }
            Task::HatchPhase { egg, phase } => {
                let hatchling = {
                    let Habitat {
                        eggs,
                        scheduler,
                        tunables,
                        ..
                    } = &mut self.habitat;
                    eggs.advance_hatch(egg, phase, &tunables.egg, scheduler)
                };
                return hatchling.map(|hatchling| self.spawn_hatchling(&hatchling));
            }
            Task::RemoveShell { egg } => {
                let hatched = self
                    .habitat
                    .eggs
                    .get(egg)
                    .is_some_and(|shell| shell.state() == EggState::Hatched);
                if hatched && self.habitat.eggs.remove(egg).is_some() {
                    debug!(egg_id = %egg, "Shell removed");
                }
            }
        }
        None
    }

    fn agent_with_habitat(&mut self, id: AgentId) -> Option<(&mut Agent, &mut Habitat)> {
        let agent = self.roster.iter_mut().find(|agent| agent.id == id)?;
        Some((agent, &mut self.habitat))
    }

    /// Put the juvenile from a finished hatch into the roster.
    fn spawn_hatchling(&mut self, hatchling: &Hatchling) -> AgentId {
        let parent = self.hatch_parent(hatchling);
        let juvenile = Agent::hatch(hatchling, parent, &mut self.habitat);
        let id = juvenile.id;
        self.roster.push(juvenile);
        self.hatched_total = self.hatched_total.saturating_add(1);
        id
    }

    /// The incubator if it is still a live adult, else the nearest adult
    /// within the search radius of the egg.
    fn hatch_parent(&self, hatchling: &Hatchling) -> Option<AgentId> {
        let live_incubator = hatchling.incubator.filter(|id| {
            self.roster
                .iter()
                .any(|agent| agent.id == *id && agent.is_adult())
        });
        if live_incubator.is_some() {
            return live_incubator;
        }
        let radius = self.habitat.tunables.egg.parent_search_radius;
        self.roster
            .iter()
            .filter(|agent| agent.is_adult())
            .map(|agent| (agent.id, agent.position.distance_to(hatchling.position)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roost_agents::Tunables;
    use roost_types::{EggId, Vec2};
    use roost_world::Viewport;

    use super::*;

    fn simulation() -> Simulation {
        Simulation::new(
            Viewport::new(1000.0, 800.0).unwrap(),
            Tunables::default(),
            SmallRng::seed_from_u64(21),
        )
    }

    fn adult_at(sim: &mut Simulation, x: f64, y: f64) -> AgentId {
        let mut adult = Agent::spawn_adult(sim.habitat_mut());
        adult.position = Vec2::new(x, y);
        sim.insert_agent(adult)
    }

    fn hatchling(incubator: Option<AgentId>) -> Hatchling {
        Hatchling {
            egg: EggId::new(),
            position: Vec2::new(500.0, 500.0),
            incubator,
        }
    }

    #[test]
    fn live_incubator_is_the_parent() {
        let mut sim = simulation();
        let incubator = adult_at(&mut sim, 10.0, 10.0);
        let _closer = adult_at(&mut sim, 500.0, 500.0);
        assert_eq!(sim.hatch_parent(&hatchling(Some(incubator))), Some(incubator));
    }

    #[test]
    fn missing_incubator_falls_back_to_nearest_adult() {
        let mut sim = simulation();
        let _far = adult_at(&mut sim, 560.0, 500.0);
        let near = adult_at(&mut sim, 520.0, 500.0);
        let _outside = adult_at(&mut sim, 700.0, 700.0);
        assert_eq!(sim.hatch_parent(&hatchling(Some(AgentId::new()))), Some(near));
    }

    #[test]
    fn replacement_sitter_parents_the_hatchling() {
        let mut sim = simulation();
        let first = adult_at(&mut sim, 100.0, 100.0);
        let second = adult_at(&mut sim, 150.0, 150.0);
        let egg = sim.habitat_mut().eggs.lay(Vec2::new(500.0, 500.0));
        assert!(sim.habitat_mut().eggs.get_mut(egg).unwrap().start_sitting(first));
        sim.remove_agent(first).unwrap();
        assert!(sim.habitat_mut().eggs.get_mut(egg).unwrap().start_sitting(second));

        let incubator = sim.habitat().eggs.get(egg).unwrap().incubator();
        assert_eq!(sim.hatch_parent(&hatchling(incubator)), Some(second));
    }

    #[test]
    fn no_adult_in_range_means_no_parent() {
        let mut sim = simulation();
        let _outside = adult_at(&mut sim, 100.0, 100.0);
        assert_eq!(sim.hatch_parent(&hatchling(None)), None);
    }

    #[test]
    fn tasks_for_missing_targets_are_ignored() {
        let mut sim = simulation();
        let ghost = AgentId::new();
        let egg = EggId::new();
        for task in [
            Task::ResumeAfterPeck { agent: ghost, epoch: 1 },
            Task::FinishLaying { agent: ghost, epoch: 1 },
            Task::RideTimeout { agent: ghost, epoch: 1 },
            Task::SettleAfterSit { agent: ghost },
            Task::BeginHatching { egg },
            Task::HatchPhase { egg, phase: 1 },
            Task::RemoveShell { egg },
        ] {
            assert_eq!(sim.dispatch(task), None);
        }
        assert!(sim.agents().is_empty());
        assert!(sim.habitat().scheduler.is_empty());
    }

    #[test]
    fn shell_is_not_removed_before_hatching() {
        let mut sim = simulation();
        let egg = sim.habitat_mut().eggs.lay(Vec2::new(50.0, 50.0));
        sim.dispatch(Task::RemoveShell { egg });
        assert!(sim.habitat().eggs.get(egg).is_some());
    }
}
