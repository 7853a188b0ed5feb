//! Juvenile decision layer, evaluated before the shared wander.
//!
//! A juvenile keeps only a weak link to its parent. The simulation resolves
//! that link against the roster every tick and hands the result in as a
//! [`ParentLink`]; a link that no longer resolves to a live adult is
//! cleared for good.

use roost_types::{AgentId, Animation, Vec2};
use tracing::debug;

use crate::agent::{Agent, JuvenileState};
use crate::egg::Hatchling;
use crate::habitat::Habitat;
use crate::task::Task;

/// What a juvenile can see of its parent this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentView {
    /// Parent's top-left corner.
    pub position: Vec2,
    /// Parent's facing.
    pub facing_right: bool,
    /// Whether the parent is sitting on an egg.
    pub sitting: bool,
}

impl ParentView {
    /// Capture the parts of `parent` a juvenile reacts to.
    pub const fn of(parent: &Agent) -> Self {
        Self {
            position: parent.position,
            facing_right: parent.facing_right,
            sitting: parent.sitting,
        }
    }
}

/// Result of resolving a juvenile's parent link against the roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLink {
    /// No parent was ever recorded, or it was already cleared.
    Unbound,
    /// A parent was recorded but is no longer a live adult.
    Lost,
    /// The parent is alive.
    Present(ParentView),
}

impl Agent {
    /// Spawn the juvenile for a freshly hatched egg.
    ///
    /// The hatchling lands a few pixels from the egg with a small random
    /// velocity.
    pub fn hatch(hatchling: &Hatchling, parent: Option<AgentId>, habitat: &mut Habitat) -> Self {
        let scatter = habitat.tunables.egg.hatchling_scatter;
        let speed = habitat.tunables.egg.hatchling_velocity;
        let size = habitat.tunables.juvenile.size;
        let offset = Vec2::new(habitat.jitter(scatter), habitat.jitter(scatter));
        let velocity = Vec2::new(habitat.jitter(speed), habitat.jitter(speed));
        let position = habitat.viewport.clamp(hatchling.position + offset, size);
        let agent = Self::new_juvenile(position, velocity, parent, size);
        debug!(
            agent_id = %agent.id,
            egg_id = %hatchling.egg,
            parent = ?parent,
            "Juvenile hatched"
        );
        agent
    }

    /// Decide one tick: the juvenile layer first, then the shared wander.
    ///
    /// Adults skip straight to [`Agent::wander`].
    pub fn decide(&mut self, elapsed_ms: f64, link: ParentLink, habitat: &mut Habitat) {
        if self.juvenile.is_none() {
            self.wander(elapsed_ms, habitat);
            return;
        }
        if self.jumping {
            self.wander(elapsed_ms, habitat);
            return;
        }
        if self.pecking {
            return;
        }
        if self.is_fleeing() {
            self.continue_flee(elapsed_ms, habitat);
            return;
        }
        match link {
            ParentLink::Present(parent) => {
                if self.follow_parent_layer(parent, habitat) {
                    return;
                }
            }
            ParentLink::Lost => self.lose_parent(habitat),
            ParentLink::Unbound => {}
        }
        self.wander(elapsed_ms, habitat);
    }

    fn lose_parent(&mut self, habitat: &Habitat) {
        let was_riding = self.is_riding();
        if let Some(juvenile) = self.juvenile.as_mut() {
            debug!(agent_id = %self.id, parent = ?juvenile.parent, "Parent lost");
            *juvenile = JuvenileState {
                fleeing: juvenile.fleeing,
                flee_elapsed_ms: juvenile.flee_elapsed_ms,
                ..JuvenileState::default()
            };
        }
        if was_riding {
            self.clamp_to(habitat);
            self.set_animation(Animation::Idle);
        }
    }

    /// Returns `true` if the parent layer claimed this tick.
    fn follow_parent_layer(&mut self, parent: ParentView, habitat: &mut Habitat) -> bool {
        let distance = self.position.distance_to(parent.position);
        if parent.sitting {
            if self.is_riding() {
                self.stop_riding(habitat);
            }
            self.approach_sitting_parent(parent, distance, habitat);
            return true;
        }
        if let Some(juvenile) = self.juvenile.as_mut() {
            juvenile.approaching_parent = false;
        }

        let tunables = &habitat.tunables.juvenile;
        let (mount_distance, riding_chance) = (tunables.mount_distance, tunables.riding_chance);
        if !self.is_riding() && distance <= mount_distance && habitat.roll(riding_chance) {
            self.start_riding(parent, habitat);
            return true;
        }
        if self.is_riding() {
            self.ride(parent, habitat);
            return true;
        }

        let tunables = &habitat.tunables.juvenile;
        let (far, close, drift) = (
            tunables.follow_parent_distance,
            tunables.close_follow_distance,
            tunables.follow_drift_chance,
        );
        if distance > far || (distance > close && habitat.roll(drift)) {
            self.follow_parent(parent, habitat);
            return true;
        }
        if let Some(juvenile) = self.juvenile.as_mut() {
            juvenile.following_parent = false;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Sitting parent
    // -----------------------------------------------------------------------

    fn approach_sitting_parent(&mut self, parent: ParentView, distance: f64, habitat: &Habitat) {
        let tunables = &habitat.tunables.juvenile;
        let Some(juvenile) = self.juvenile.as_mut() else {
            return;
        };
        juvenile.following_parent = false;
        if juvenile.approaching_parent {
            if distance <= tunables.sitting_parent_target_distance {
                juvenile.approaching_parent = false;
            }
        } else if distance > tunables.sitting_parent_distance {
            juvenile.approaching_parent = true;
        }
        let approaching = juvenile.approaching_parent;
        if approaching && self.step_toward(parent.position, tunables.sitting_parent_speed, habitat) {
            self.set_animation(Animation::Walking);
            return;
        }
        self.set_animation(Animation::Idle);
    }

    // -----------------------------------------------------------------------
    // Following
    // -----------------------------------------------------------------------

    fn follow_parent(&mut self, parent: ParentView, habitat: &Habitat) {
        let tunables = &habitat.tunables.juvenile;
        let following = self.position.distance_to(parent.position) > tunables.follow_stop_distance;
        if let Some(juvenile) = self.juvenile.as_mut() {
            juvenile.following_parent = following;
        }
        if !following {
            self.set_animation(Animation::Idle);
            return;
        }
        if let Some(velocity) = self.position.toward(parent.position, tunables.parent_follow_speed) {
            self.velocity = velocity;
            self.facing_right = velocity.x > 0.0;
            self.step_reflecting(habitat);
        }
        self.set_animation(Animation::Walking);
    }

    // -----------------------------------------------------------------------
    // Riding
    // -----------------------------------------------------------------------

    fn start_riding(&mut self, parent: ParentView, habitat: &mut Habitat) {
        let Some(juvenile) = self.juvenile.as_mut() else {
            return;
        };
        juvenile.riding = true;
        juvenile.following_parent = false;
        self.idling = false;
        self.target_feed = None;
        self.following_pointer = false;
        let epoch = self.next_epoch();
        let (min, max) = (habitat.tunables.juvenile.ride_min_ms, habitat.tunables.juvenile.ride_max_ms);
        let timeout = habitat.uniform(min, max);
        habitat.scheduler.schedule(
            timeout,
            Task::RideTimeout {
                agent: self.id,
                epoch,
            },
        );
        self.pin_to(parent, habitat);
        self.set_animation(Animation::Riding);
    }

    fn ride(&mut self, parent: ParentView, habitat: &mut Habitat) {
        self.pin_to(parent, habitat);
        self.set_animation(Animation::Riding);
        if habitat.roll(habitat.tunables.juvenile.riding_stop_chance) {
            self.stop_riding(habitat);
        }
    }

    fn pin_to(&mut self, parent: ParentView, habitat: &Habitat) {
        let tunables = &habitat.tunables.juvenile;
        self.position = parent.position + Vec2::new(tunables.ride_offset_x, tunables.ride_offset_y);
        self.facing_right = parent.facing_right;
        self.clamp_to(habitat);
    }

    /// Hop off the parent with a small scatter. No-op unless riding.
    pub fn stop_riding(&mut self, habitat: &mut Habitat) {
        let Some(juvenile) = self.juvenile.as_mut().filter(|j| j.riding) else {
            return;
        };
        juvenile.riding = false;
        self.next_epoch();
        let scatter = habitat.tunables.juvenile.dismount_scatter;
        let offset = Vec2::new(habitat.jitter(scatter), habitat.jitter(scatter));
        self.position += offset;
        self.clamp_to(habitat);
        self.set_animation(Animation::Idle);
    }

    /// The ride timeout fired: dismount with the configured chance.
    pub fn ride_timeout(&mut self, epoch: u64, habitat: &mut Habitat) {
        if epoch != self.epoch || !self.is_riding() {
            return;
        }
        if habitat.roll(habitat.tunables.juvenile.ride_timeout_dismount_chance) {
            self.stop_riding(habitat);
        }
    }

    // -----------------------------------------------------------------------
    // Fleeing
    // -----------------------------------------------------------------------

    /// Start running from the pointer. Abandons pecks, idles, and feed.
    pub fn run_away(&mut self) {
        let Some(juvenile) = self.juvenile.as_mut() else {
            return;
        };
        if juvenile.fleeing {
            return;
        }
        juvenile.fleeing = true;
        juvenile.flee_elapsed_ms = 0.0;
        juvenile.following_parent = false;
        juvenile.approaching_parent = false;
        self.pecking = false;
        self.idling = false;
        self.target_feed = None;
        self.following_pointer = false;
        self.next_epoch();
    }

    /// React to a pointer move: a flee ends once the pointer is far enough.
    pub fn pointer_moved(&mut self, pointer: Vec2, habitat: &Habitat) {
        let stop = habitat.tunables.juvenile.run_away_stop_distance;
        let far = self.position.distance_to(pointer) > stop;
        if let Some(juvenile) = self.juvenile.as_mut().filter(|j| j.fleeing) {
            if far {
                juvenile.fleeing = false;
                juvenile.flee_elapsed_ms = 0.0;
            }
        }
    }

    fn continue_flee(&mut self, elapsed_ms: f64, habitat: &Habitat) {
        let tunables = &habitat.tunables.juvenile;
        let away = self.position - habitat.pointer.position();
        let target = self.position + away;
        if let Some(velocity) = self.position.toward(target, tunables.run_away_speed) {
            self.velocity = velocity;
            self.facing_right = velocity.x > 0.0;
            self.step_reflecting(habitat);
            self.set_animation(Animation::Running);
        }
        let duration = tunables.run_away_duration_ms;
        if let Some(juvenile) = self.juvenile.as_mut() {
            juvenile.flee_elapsed_ms += elapsed_ms;
            if juvenile.flee_elapsed_ms >= duration {
                juvenile.fleeing = false;
                juvenile.flee_elapsed_ms = 0.0;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roost_types::BehaviorMode;
    use roost_world::Viewport;

    use super::*;
    use crate::config::Tunables;

    fn quiet() -> Tunables {
        let mut tunables = Tunables::default();
        tunables.adult.direction_change_chance = 0.0;
        tunables.adult.peck_chance = 0.0;
        tunables.adult.idle_chance = 0.0;
        tunables.juvenile.riding_chance = 0.0;
        tunables.juvenile.riding_stop_chance = 0.0;
        tunables.juvenile.follow_drift_chance = 0.0;
        tunables
    }

    fn habitat(tunables: Tunables) -> Habitat {
        Habitat::new(
            Viewport::new(1000.0, 800.0).unwrap(),
            tunables,
            SmallRng::seed_from_u64(5),
        )
    }

    fn parent_at(x: f64, y: f64) -> ParentView {
        ParentView {
            position: Vec2::new(x, y),
            facing_right: false,
            sitting: false,
        }
    }

    fn chick_at(x: f64, y: f64) -> Agent {
        Agent::new_juvenile(Vec2::new(x, y), Vec2::new(1.0, 0.0), Some(AgentId::new()), 16.0)
    }

    #[test]
    fn far_parent_is_followed() {
        let mut habitat = habitat(quiet());
        let mut chick = chick_at(100.0, 100.0);
        let parent = parent_at(300.0, 100.0);
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert_eq!(chick.mode(), BehaviorMode::FollowingParent);
        assert!((chick.position.x - 101.8).abs() < 1e-9);
    }

    #[test]
    fn near_parent_without_drift_wanders() {
        let mut habitat = habitat(quiet());
        let mut chick = chick_at(100.0, 100.0);
        chick.decide(16.0, ParentLink::Present(parent_at(160.0, 100.0)), &mut habitat);
        assert_ne!(chick.mode(), BehaviorMode::FollowingParent);
        assert!((chick.position.x - 101.0).abs() < 1e-9);
    }

    #[test]
    fn sitting_parent_approach_has_hysteresis() {
        let mut habitat = habitat(quiet());
        let mut chick = chick_at(100.0, 100.0);
        let mut parent = parent_at(155.0, 100.0);
        parent.sitting = true;

        // 55 px: inside the start distance, stay put.
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert!((chick.position.x - 100.0).abs() < 1e-9);

        // 70 px: start approaching, and keep going until within 50.
        parent.position.x = 170.0;
        let mut ticks = 0;
        loop {
            chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
            ticks += 1;
            let distance = chick.position.distance_to(parent.position);
            if distance <= 50.0 + 1e-9 {
                break;
            }
            assert!(ticks < 100);
        }
        assert!(ticks >= 19);
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        let settled = chick.position;
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert_eq!(chick.position, settled);
    }

    #[test]
    fn rider_is_pinned_and_dismounts_when_parent_sits() {
        let mut tunables = quiet();
        tunables.juvenile.riding_chance = 1.0;
        let mut habitat = habitat(tunables);
        let mut chick = chick_at(100.0, 100.0);
        let mut parent = parent_at(105.0, 100.0);

        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert!(chick.is_riding());
        assert_eq!(chick.position, Vec2::new(107.0, 92.0));
        assert!(!chick.facing_right);
        assert_eq!(habitat.scheduler.len(), 1);

        parent.position = Vec2::new(200.0, 200.0);
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert_eq!(chick.position, Vec2::new(202.0, 192.0));

        parent.sitting = true;
        chick.decide(16.0, ParentLink::Present(parent), &mut habitat);
        assert!(!chick.is_riding());
    }

    #[test]
    fn ride_timeout_honors_epoch() {
        let mut tunables = quiet();
        tunables.juvenile.riding_chance = 1.0;
        tunables.juvenile.ride_timeout_dismount_chance = 1.0;
        let mut habitat = habitat(tunables);
        let mut chick = chick_at(100.0, 100.0);
        chick.decide(16.0, ParentLink::Present(parent_at(100.0, 100.0)), &mut habitat);
        let epoch = chick.epoch;

        chick.ride_timeout(epoch.wrapping_sub(1), &mut habitat);
        assert!(chick.is_riding());
        chick.ride_timeout(epoch, &mut habitat);
        assert!(!chick.is_riding());
    }

    #[test]
    fn lost_parent_is_cleared_for_good() {
        let mut tunables = quiet();
        tunables.juvenile.riding_chance = 1.0;
        let mut habitat = habitat(tunables);
        let mut chick = chick_at(100.0, 100.0);
        chick.decide(16.0, ParentLink::Present(parent_at(100.0, 100.0)), &mut habitat);
        assert!(chick.is_riding());

        chick.decide(16.0, ParentLink::Lost, &mut habitat);
        assert!(!chick.is_riding());
        assert_eq!(chick.parent(), None);
        assert_ne!(chick.mode(), BehaviorMode::FollowingParent);
    }

    #[test]
    fn flee_runs_away_and_times_out() {
        let mut habitat = habitat(quiet());
        habitat.pointer.move_to(Vec2::new(90.0, 100.0));
        let mut chick = chick_at(100.0, 100.0);
        chick.run_away();
        assert_eq!(chick.mode(), BehaviorMode::Fleeing);

        chick.decide(1_000.0, ParentLink::Unbound, &mut habitat);
        assert!((chick.position.x - 104.0).abs() < 1e-9);
        assert!(chick.facing_right);
        chick.decide(1_000.0, ParentLink::Unbound, &mut habitat);
        assert!(chick.is_fleeing());
        chick.decide(1_000.0, ParentLink::Unbound, &mut habitat);
        assert!(!chick.is_fleeing());
    }

    #[test]
    fn distant_pointer_move_ends_flee() {
        let habitat = habitat(quiet());
        let mut chick = chick_at(100.0, 100.0);
        chick.run_away();
        chick.pointer_moved(Vec2::new(150.0, 100.0), &habitat);
        assert!(chick.is_fleeing());
        chick.pointer_moved(Vec2::new(250.0, 100.0), &habitat);
        assert!(!chick.is_fleeing());
    }

    #[test]
    fn rush_to_feed_interrupts_flee() {
        let mut habitat = habitat(quiet());
        let feed = habitat.feed.place_feed(Vec2::new(400.0, 400.0));
        let mut chick = chick_at(100.0, 100.0);
        chick.run_away();
        assert!(chick.rush_to_feed(feed));
        assert!(!chick.is_fleeing());
    }

    #[test]
    fn hatchling_lands_near_egg() {
        let mut habitat = habitat(quiet());
        let hatchling = Hatchling {
            egg: roost_types::EggId::new(),
            position: Vec2::new(300.0, 300.0),
            incubator: None,
        };
        let parent = AgentId::new();
        for _ in 0..50 {
            let chick = Agent::hatch(&hatchling, Some(parent), &mut habitat);
            assert!((chick.position.x - 300.0).abs() <= 5.0);
            assert!((chick.position.y - 300.0).abs() <= 5.0);
            assert!(chick.velocity.x.abs() <= 0.75);
            assert_eq!(chick.parent(), Some(parent));
        }
    }
}
