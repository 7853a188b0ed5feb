//! The [`Simulation`]: agent roster, habitat, clock, and input events.
//!
//! The simulation owns every live entity. Agents are stored in insertion
//! order and visited in that order each tick; eggs, feed piles, the pointer
//! and the task queue live in the [`Habitat`] it lends to each agent in
//! turn.
//!
//! Input events arrive from the host between ticks. They only flip flags or
//! queue work; nothing here moves an agent except [`Simulation::resize`],
//! which re-clamps.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use roost_agents::{Agent, Egg, Habitat, Tunables};
use roost_types::{AgentId, EggId, FeedId, Vec2};
use roost_world::{Viewport, WorldError};
use tracing::{debug, info, warn};

use crate::clock::SimulationClock;
use crate::config::SimulationConfig;

/// A running barnyard.
#[derive(Debug)]
pub struct Simulation {
    pub(crate) clock: SimulationClock,
    pub(crate) roster: Vec<Agent>,
    pub(crate) habitat: Habitat,
    pub(crate) summary_interval_ticks: u64,
    pub(crate) hatched_total: u64,
    hovered: Vec<AgentId>,
}

impl Simulation {
    /// An empty barnyard at tick 0.
    pub fn new(viewport: Viewport, tunables: Tunables, rng: SmallRng) -> Self {
        Self {
            clock: SimulationClock::new(),
            roster: Vec::new(),
            habitat: Habitat::new(viewport, tunables, rng),
            summary_interval_ticks: 0,
            hatched_total: 0,
            hovered: Vec::new(),
        }
    }

    /// Build a barnyard from configuration and spawn the initial adults.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] if the configured viewport is
    /// not usable.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, WorldError> {
        let viewport = Viewport::new(config.world.viewport_width, config.world.viewport_height)?;
        let rng = config
            .world
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let mut simulation = Self::new(viewport, config.tunables.clone(), rng);
        simulation.summary_interval_ticks = config.logging.summary_interval_ticks;
        simulation.spawn_adults(config.world.initial_population);
        info!(
            world = %config.world.name,
            adults = simulation.roster.len(),
            width = viewport.width(),
            height = viewport.height(),
            seeded = config.world.seed.is_some(),
            "Barnyard bootstrapped"
        );
        Ok(simulation)
    }

    /// Spawn `count` adults at random positions.
    pub fn spawn_adults(&mut self, count: u32) {
        for _ in 0..count {
            let adult = Agent::spawn_adult(&mut self.habitat);
            self.roster.push(adult);
        }
    }

    /// Append an agent built elsewhere. It is clamped into the viewport.
    pub fn insert_agent(&mut self, mut agent: Agent) -> AgentId {
        agent.clamp_to(&self.habitat);
        let id = agent.id;
        self.roster.push(agent);
        id
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Agents in roster order.
    pub fn agents(&self) -> &[Agent] {
        &self.roster
    }

    /// Look up an agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.roster.iter().find(|agent| agent.id == id)
    }

    /// Look up an agent mutably.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.roster.iter_mut().find(|agent| agent.id == id)
    }

    /// The shared world context.
    pub const fn habitat(&self) -> &Habitat {
        &self.habitat
    }

    /// The shared world context, mutably.
    pub const fn habitat_mut(&mut self) -> &mut Habitat {
        &mut self.habitat
    }

    /// Ticks completed.
    pub const fn tick_count(&self) -> u64 {
        self.clock.tick()
    }

    /// Virtual time in milliseconds.
    pub const fn now_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    /// Juveniles hatched since bootstrap.
    pub const fn hatched_total(&self) -> u64 {
        self.hatched_total
    }

    /// Whether the pointer carries feed.
    pub const fn has_mouse_food(&self) -> bool {
        self.habitat.pointer.has_food()
    }

    /// Last reported pointer position.
    pub const fn mouse_position(&self) -> Vec2 {
        self.habitat.pointer.position()
    }

    /// Agents whose sprite box contains `point`, in roster order.
    pub fn agents_at(&self, point: Vec2) -> Vec<AgentId> {
        self.roster
            .iter()
            .filter(|agent| {
                let offset = point - agent.position;
                (0.0..=agent.size).contains(&offset.x) && (0.0..=agent.size).contains(&offset.y)
            })
            .map(|agent| agent.id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// The pointer moved.
    ///
    /// Fleeing juveniles check whether they can stop, and any agent the
    /// pointer newly hovers gets [`Simulation::pointer_entered`].
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let point = Vec2::new(x, y);
        self.habitat.pointer.move_to(point);
        for agent in &mut self.roster {
            if agent.is_fleeing() {
                agent.pointer_moved(point, &self.habitat);
            }
        }

        let under = self.agents_at(point);
        let entered: Vec<AgentId> = under
            .iter()
            .filter(|id| !self.hovered.contains(id))
            .copied()
            .collect();
        self.hovered = under;
        for id in entered {
            self.pointer_entered(id);
        }
    }

    /// Pick up a handful of feed from the bag.
    pub const fn take_feed_from_bag(&mut self) {
        self.habitat.pointer.pick_up_food();
    }

    /// A click. While carrying feed this drops a pile at the click point.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<FeedId> {
        let point = Vec2::new(x, y);
        self.habitat.pointer.move_to(point);
        if !self.habitat.pointer.drop_food() {
            return None;
        }
        Some(self.place_feed(point))
    }

    /// Place a pile centred on `point` and send every agent in range to it.
    pub fn place_feed(&mut self, point: Vec2) -> FeedId {
        let feed = self.habitat.feed.place_feed(point);
        let radius = self.habitat.feed.notify_radius(&self.habitat.viewport);
        let Some(pile) = self.habitat.feed.get(feed).map(|pile| pile.position) else {
            return feed;
        };
        let mut rushed = 0_usize;
        for agent in &mut self.roster {
            if agent.position.distance_to(pile) <= radius && agent.rush_to_feed(feed) {
                rushed = rushed.saturating_add(1);
            }
        }
        debug!(feed_id = %feed, x = point.x, y = point.y, rushed, "Feed placed");
        feed
    }

    /// The pointer entered an agent's sprite.
    ///
    /// Adults jump and shake off any riding juvenile. Juveniles hop off if
    /// riding and flee otherwise. Returns whether anything changed.
    pub fn pointer_entered(&mut self, id: AgentId) -> bool {
        let Self {
            roster, habitat, ..
        } = self;
        let Some(agent) = roster.iter_mut().find(|agent| agent.id == id) else {
            return false;
        };
        debug!(agent_id = %id, mode = agent.mode().label(), "Pointer entered agent");
        if agent.is_adult() {
            let jumped = agent.jump();
            let mut dismounted = false;
            for rider in roster
                .iter_mut()
                .filter(|rider| rider.is_riding() && rider.parent() == Some(id))
            {
                rider.stop_riding(habitat);
                dismounted = true;
            }
            return jumped || dismounted;
        }
        if agent.is_riding() {
            agent.stop_riding(habitat);
        } else {
            agent.run_away();
        }
        true
    }

    // -----------------------------------------------------------------------
    // Viewport and roster maintenance
    // -----------------------------------------------------------------------

    /// The viewport changed size. Every agent is clamped back inside.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] and keeps the old viewport
    /// if the new size is not usable.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), WorldError> {
        let viewport = match Viewport::new(width, height) {
            Ok(viewport) => viewport,
            Err(error) => {
                warn!(width, height, %error, "Ignoring resize to invalid viewport");
                return Err(error);
            }
        };
        self.habitat.viewport = viewport;
        for agent in &mut self.roster {
            agent.clamp_to(&self.habitat);
        }
        debug!(width, height, "Viewport resized");
        Ok(())
    }

    /// Take an agent out of the roster.
    ///
    /// Any egg it sat on is freed. Juveniles bonded to it lose their parent
    /// on their next tick.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.roster.iter().position(|agent| agent.id == id)?;
        let agent = self.roster.remove(index);
        self.habitat.eggs.release_sitter(id);
        self.hovered.retain(|hovered| *hovered != id);
        debug!(agent_id = %id, kind = ?agent.kind, "Agent removed");
        Some(agent)
    }

    /// Take an egg off the board. An adult sitting on it stands up.
    pub fn remove_egg(&mut self, id: EggId) -> Option<Egg> {
        let egg = self.habitat.eggs.remove(id)?;
        let Self {
            roster, habitat, ..
        } = self;
        for agent in roster
            .iter_mut()
            .filter(|agent| agent.sitting_egg == Some(id))
        {
            agent.stop_sitting(habitat);
        }
        debug!(egg_id = %id, "Egg removed");
        Some(egg)
    }
}
