//! Egg incubation and hatching.
//!
//! An egg moves strictly forward through `Waiting -> Hatching -> Hatched`
//! and is then removed from the roster:
//!
//! 1. An adult claims a waiting, unoccupied egg with [`Egg::start_sitting`].
//! 2. [`Egg::update_sitting`] accumulates incubation. Once enough has built
//!    up it releases the sitter and queues [`Task::BeginHatching`].
//! 3. [`EggRoster::begin_hatching`] shows the first crack frame and queues
//!    one [`Task::HatchPhase`] per remaining frame.
//! 4. The last phase marks the egg hatched, hands back a [`Hatchling`] for
//!    the caller to spawn, and queues [`Task::RemoveShell`].
//!
//! Every step re-checks the egg's state, so a replayed or stale task can
//! never hatch an egg twice.

use roost_types::{AgentId, EggId, EggSnapshot, EggState, Vec2};
use roost_world::Scheduler;
use tracing::debug;

use crate::config::EggTunables;
use crate::task::Task;

/// A single egg.
#[derive(Debug, Clone, PartialEq)]
pub struct Egg {
    id: EggId,
    position: Vec2,
    state: EggState,
    frame: u32,
    phase: usize,
    sitter: Option<AgentId>,
    incubator: Option<AgentId>,
    incubation_ms: f64,
    incubated: bool,
}

impl Egg {
    /// A fresh egg waiting for a sitter.
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EggId::new(),
            position,
            state: EggState::Waiting,
            frame: 0,
            phase: 0,
            sitter: None,
            incubator: None,
            incubation_ms: 0.0,
            incubated: false,
        }
    }

    /// Egg identity.
    pub const fn id(&self) -> EggId {
        self.id
    }

    /// Top-left corner of the sprite.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Lifecycle state.
    pub const fn state(&self) -> EggState {
        self.state
    }

    /// Sprite frame on screen.
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// The adult currently sitting, if any.
    pub const fn sitter(&self) -> Option<AgentId> {
        self.sitter
    }

    /// The first adult that sat on this egg.
    pub const fn incubator(&self) -> Option<AgentId> {
        self.incubator
    }

    /// Incubation accumulated under the current sitter.
    pub const fn incubation_ms(&self) -> f64 {
        self.incubation_ms
    }

    /// Whether an adult may claim this egg.
    ///
    /// A fully incubated egg stays unclaimable while it waits to crack.
    pub const fn is_available(&self) -> bool {
        matches!(self.state, EggState::Waiting) && self.sitter.is_none() && !self.incubated
    }

    /// Claim the egg for `agent`.
    ///
    /// Rejected (returning `false`, leaving the current sitter in place)
    /// unless the egg is waiting and unoccupied. Incubation restarts from
    /// zero on every accepted claim.
    pub fn start_sitting(&mut self, agent: AgentId) -> bool {
        if !self.is_available() {
            return false;
        }
        self.sitter = Some(agent);
        self.incubator = Some(agent);
        self.incubation_ms = 0.0;
        debug!(egg_id = %self.id, agent_id = %agent, "Sitting started");
        true
    }

    /// Accumulate incubation time.
    ///
    /// Returns `true` exactly once: on the call where incubation reaches
    /// the requirement. That call clears the sitter and queues hatching.
    pub fn update_sitting(
        &mut self,
        elapsed_ms: f64,
        tunables: &EggTunables,
        scheduler: &mut Scheduler<Task>,
    ) -> bool {
        if self.sitter.is_none() || self.state != EggState::Waiting {
            return false;
        }
        self.incubation_ms += elapsed_ms;
        if self.incubation_ms < tunables.sitting_required_ms {
            return false;
        }
        self.sitter = None;
        self.incubated = true;
        scheduler.schedule(tunables.move_away_delay_ms, Task::BeginHatching { egg: self.id });
        debug!(egg_id = %self.id, incubation_ms = self.incubation_ms, "Incubation complete");
        true
    }

    /// Drop `agent` as sitter without completing incubation.
    pub fn release(&mut self, agent: AgentId) -> bool {
        if self.sitter != Some(agent) {
            return false;
        }
        self.sitter = None;
        true
    }

    /// Render view.
    pub const fn snapshot(&self) -> EggSnapshot {
        EggSnapshot {
            id: self.id,
            position: self.position,
            state: self.state,
            frame: self.frame,
            occupied: self.sitter.is_some(),
        }
    }
}

/// What the caller needs to spawn a juvenile from a hatched egg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hatchling {
    /// The egg that hatched.
    pub egg: EggId,
    /// Where the egg sits.
    pub position: Vec2,
    /// The first adult that incubated it.
    pub incubator: Option<AgentId>,
}

/// All live eggs, in laying order.
#[derive(Debug, Clone, Default)]
pub struct EggRoster {
    eggs: Vec<Egg>,
}

impl EggRoster {
    /// An empty roster.
    pub const fn new() -> Self {
        Self { eggs: Vec::new() }
    }

    /// Lay a new egg at `position` and return its id.
    pub fn lay(&mut self, position: Vec2) -> EggId {
        let egg = Egg::new(position);
        let id = egg.id;
        debug!(egg_id = %id, x = position.x, y = position.y, "Egg laid");
        self.eggs.push(egg);
        id
    }

    /// Look up a live egg.
    pub fn get(&self, id: EggId) -> Option<&Egg> {
        self.eggs.iter().find(|egg| egg.id == id)
    }

    /// Look up a live egg mutably.
    pub fn get_mut(&mut self, id: EggId) -> Option<&mut Egg> {
        self.eggs.iter_mut().find(|egg| egg.id == id)
    }

    /// Take an egg off the board. Returns the removed egg.
    pub fn remove(&mut self, id: EggId) -> Option<Egg> {
        let index = self.eggs.iter().position(|egg| egg.id == id)?;
        Some(self.eggs.remove(index))
    }

    /// Eggs in laying order.
    pub fn iter(&self) -> impl Iterator<Item = &Egg> {
        self.eggs.iter()
    }

    /// Number of live eggs.
    pub fn len(&self) -> usize {
        self.eggs.len()
    }

    /// Whether no egg is live.
    pub fn is_empty(&self) -> bool {
        self.eggs.is_empty()
    }

    /// The first available egg (in laying order) within `radius` of `from`.
    pub fn first_available_within(&self, from: Vec2, radius: f64) -> Option<EggId> {
        self.eggs
            .iter()
            .find(|egg| egg.is_available() && from.distance_to(egg.position) <= radius)
            .map(|egg| egg.id)
    }

    /// Release `agent` from whichever egg it sits on.
    pub fn release_sitter(&mut self, agent: AgentId) {
        for egg in &mut self.eggs {
            egg.release(agent);
        }
    }

    /// Start cracking a fully incubated egg.
    ///
    /// No-op unless the egg exists and is still waiting.
    pub fn begin_hatching(
        &mut self,
        id: EggId,
        tunables: &EggTunables,
        scheduler: &mut Scheduler<Task>,
    ) {
        let Some(egg) = self.get_mut(id) else {
            return;
        };
        if egg.state != EggState::Waiting {
            return;
        }
        egg.state = EggState::Hatching;
        egg.sitter = None;
        egg.phase = 0;
        if let Some(&first) = tunables.hatch_frames.first() {
            egg.frame = first;
        }
        debug!(egg_id = %id, "Hatching started");
        scheduler.schedule(
            tunables.hatching_frame_delay_ms,
            Task::HatchPhase { egg: id, phase: 1 },
        );
    }

    /// Show hatch frame `phase`; the last phase hatches the egg.
    ///
    /// Returns the hatchling exactly once. Phases that are out of order, or
    /// that arrive for an egg that is not hatching, are ignored.
    pub fn advance_hatch(
        &mut self,
        id: EggId,
        phase: usize,
        tunables: &EggTunables,
        scheduler: &mut Scheduler<Task>,
    ) -> Option<Hatchling> {
        let egg = self.get_mut(id)?;
        if egg.state != EggState::Hatching || egg.phase.checked_add(1) != Some(phase) {
            return None;
        }
        let frame = *tunables.hatch_frames.get(phase)?;
        egg.phase = phase;
        egg.frame = frame;

        let last = tunables.hatch_frames.len().saturating_sub(1);
        if phase < last {
            scheduler.schedule(
                tunables.hatching_frame_delay_ms,
                Task::HatchPhase {
                    egg: id,
                    phase: phase.saturating_add(1),
                },
            );
            return None;
        }

        egg.state = EggState::Hatched;
        scheduler.schedule(tunables.shell_remove_delay_ms, Task::RemoveShell { egg: id });
        debug!(egg_id = %id, "Egg hatched");
        Some(Hatchling {
            egg: id,
            position: egg.position,
            incubator: egg.incubator,
        })
    }

    /// Render view of every egg.
    pub fn snapshots(&self) -> Vec<EggSnapshot> {
        self.eggs.iter().map(Egg::snapshot).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tunables() -> EggTunables {
        EggTunables::default()
    }

    #[test]
    fn second_sitter_is_rejected() {
        let mut egg = Egg::new(Vec2::new(10.0, 10.0));
        let first = AgentId::new();
        let second = AgentId::new();
        assert!(egg.start_sitting(first));
        assert!(!egg.start_sitting(second));
        assert_eq!(egg.sitter(), Some(first));
        assert_eq!(egg.incubator(), Some(first));
    }

    #[test]
    fn latest_accepted_sitter_becomes_incubator() {
        let mut egg = Egg::new(Vec2::new(10.0, 10.0));
        let first = AgentId::new();
        let second = AgentId::new();
        assert!(egg.start_sitting(first));
        assert!(egg.release(first));
        assert!(egg.start_sitting(second));
        assert_eq!(egg.incubator(), Some(second));
    }

    #[test]
    fn incubation_completes_exactly_once() {
        let tunables = tunables();
        let mut scheduler = Scheduler::new();
        let mut egg = Egg::new(Vec2::new(10.0, 10.0));
        let sitter = AgentId::new();
        assert!(egg.start_sitting(sitter));

        assert!(!egg.update_sitting(9_999.0, &tunables, &mut scheduler));
        assert!(egg.update_sitting(1.0, &tunables, &mut scheduler));
        assert_eq!(egg.sitter(), None);
        assert_eq!(egg.state(), EggState::Waiting);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due_ms(), Some(2_000.0));

        assert!(!egg.update_sitting(5_000.0, &tunables, &mut scheduler));
        assert_eq!(scheduler.len(), 1);

        // Done eggs are not up for grabs while they wait to crack.
        assert!(!egg.is_available());
        assert!(!egg.start_sitting(AgentId::new()));
    }

    #[test]
    fn incubated_egg_cannot_be_reclaimed_once_hatching() {
        let tunables = tunables();
        let mut scheduler = Scheduler::new();
        let mut roster = EggRoster::new();
        let id = roster.lay(Vec2::new(0.0, 0.0));
        roster.begin_hatching(id, &tunables, &mut scheduler);
        let egg = roster.get_mut(id).unwrap();
        assert_eq!(egg.state(), EggState::Hatching);
        assert!(!egg.start_sitting(AgentId::new()));
        assert_eq!(egg.sitter(), None);
    }

    #[test]
    fn hatch_sequence_yields_one_hatchling() {
        let tunables = tunables();
        let mut scheduler = Scheduler::new();
        let mut roster = EggRoster::new();
        let incubator = AgentId::new();
        let id = roster.lay(Vec2::new(40.0, 40.0));
        roster.get_mut(id).unwrap().start_sitting(incubator);

        roster.begin_hatching(id, &tunables, &mut scheduler);
        assert_eq!(roster.get(id).unwrap().frame(), 1);

        let mut hatchlings = Vec::new();
        let mut removed = false;
        while let Some(task) = scheduler.pop_due(f64::MAX) {
            match task {
                Task::HatchPhase { egg, phase } => {
                    if let Some(h) = roster.advance_hatch(egg, phase, &tunables, &mut scheduler) {
                        hatchlings.push(h);
                    }
                    // Replaying the same phase is a no-op.
                    assert!(roster.advance_hatch(egg, phase, &tunables, &mut scheduler).is_none());
                }
                Task::RemoveShell { egg } => {
                    assert_eq!(roster.get(egg).unwrap().frame(), 4);
                    removed = roster.remove(egg).is_some();
                }
                _ => {}
            }
        }

        assert_eq!(hatchlings.len(), 1);
        assert_eq!(hatchlings.first().unwrap().incubator, Some(incubator));
        assert!(removed);
        assert!(roster.is_empty());
        // 3 frame delays of 800 then the 2000 shell delay.
        assert!((scheduler.now_ms() - 4_400.0).abs() < 1e-9);
    }

    #[test]
    fn removed_egg_never_hatches() {
        let tunables = tunables();
        let mut scheduler = Scheduler::new();
        let mut roster = EggRoster::new();
        let id = roster.lay(Vec2::new(0.0, 0.0));
        roster.begin_hatching(id, &tunables, &mut scheduler);
        roster.remove(id);
        for phase in 1..4 {
            assert!(roster.advance_hatch(id, phase, &tunables, &mut scheduler).is_none());
        }
    }

    #[test]
    fn first_available_skips_occupied_eggs() {
        let mut roster = EggRoster::new();
        let taken = roster.lay(Vec2::new(10.0, 10.0));
        let free = roster.lay(Vec2::new(20.0, 10.0));
        roster.get_mut(taken).unwrap().start_sitting(AgentId::new());
        assert_eq!(roster.first_available_within(Vec2::new(15.0, 10.0), 30.0), Some(free));
        assert_eq!(roster.first_available_within(Vec2::new(500.0, 10.0), 30.0), None);
    }

    #[test]
    fn release_frees_only_own_egg() {
        let mut roster = EggRoster::new();
        let sitter = AgentId::new();
        let id = roster.lay(Vec2::new(10.0, 10.0));
        roster.get_mut(id).unwrap().start_sitting(sitter);
        roster.release_sitter(AgentId::new());
        assert_eq!(roster.get(id).unwrap().sitter(), Some(sitter));
        roster.release_sitter(sitter);
        assert!(roster.get(id).unwrap().is_available());
    }
}
