//! The agent record shared by adults and juveniles.
//!
//! Behavior lives in [`crate::behavior`] (the shared wander and the adult
//! actions) and [`crate::juvenile`] (the decision layer juveniles run
//! first). This module holds the state both operate on and the small
//! movement helpers they share.

use roost_types::{AgentId, AgentKind, AgentSnapshot, Animation, BehaviorMode, EggId, FeedId, Vec2};

use crate::animation::AnimationCursor;
use crate::config::AdultTunables;
use crate::habitat::Habitat;

/// State only juveniles carry.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JuvenileState {
    /// Weak link to the parent, re-resolved through the roster each tick.
    pub parent: Option<AgentId>,
    /// Running from the pointer.
    pub fleeing: bool,
    /// Time spent in the current flee.
    pub flee_elapsed_ms: f64,
    /// Perched on the parent's back.
    pub riding: bool,
    /// Moving toward the parent this tick.
    pub following_parent: bool,
    /// Walking toward a sitting parent.
    pub approaching_parent: bool,
}

/// Arc state of a hover jump.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Jump {
    /// Fraction of the jump completed, `[0, 1)`.
    pub progress: f64,
    /// Ground line the arc starts from.
    pub start_y: f64,
}

/// An adult or juvenile in the roster.
///
/// The guard flags mirror in-flight timed actions; deferred tasks check
/// them (and [`Agent::epoch`]) before acting.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Identity.
    pub id: AgentId,
    /// Adult or juvenile.
    pub kind: AgentKind,
    /// Sprite size used for bounds.
    pub size: f64,
    /// Top-left corner of the sprite.
    pub position: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Whether the sprite faces right.
    pub facing_right: bool,
    /// Animation clip and frame.
    pub animation: AnimationCursor,
    /// Frozen for a peck.
    pub pecking: bool,
    /// In a hover jump.
    pub jumping: bool,
    /// Jump arc, meaningful while `jumping`.
    pub jump: Jump,
    /// In the laying pose.
    pub laying: bool,
    /// Sitting on an egg.
    pub sitting: bool,
    /// In an idle pause.
    pub idling: bool,
    /// Time spent in the current idle pause.
    pub idle_elapsed_ms: f64,
    /// Length of the current idle pause.
    pub idle_duration_ms: f64,
    /// Tracking a pointer that carries food.
    pub following_pointer: bool,
    /// Feed pile being pursued, re-validated each tick.
    pub target_feed: Option<FeedId>,
    /// Egg being incubated, re-validated each tick.
    pub sitting_egg: Option<EggId>,
    /// Virtual time of the last lay.
    pub last_egg_ms: Option<f64>,
    /// Bumped whenever a timed action starts.
    pub epoch: u64,
    /// Present only on juveniles.
    pub juvenile: Option<JuvenileState>,
}

impl Agent {
    fn base(kind: AgentKind, size: f64, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id: AgentId::new(),
            kind,
            size,
            position,
            velocity,
            facing_right: true,
            animation: AnimationCursor::new(kind),
            pecking: false,
            jumping: false,
            jump: Jump::default(),
            laying: false,
            sitting: false,
            idling: false,
            idle_elapsed_ms: 0.0,
            idle_duration_ms: 0.0,
            following_pointer: false,
            target_feed: None,
            sitting_egg: None,
            last_egg_ms: None,
            epoch: 0,
            juvenile: None,
        }
    }

    /// Spawn an adult at a random in-bounds position with a random heading.
    pub fn spawn_adult(habitat: &mut Habitat) -> Self {
        let size = habitat.tunables.adult.size;
        let max_x = habitat.viewport.max_x(size);
        let max_y = habitat.viewport.max_y(size);
        let position = Vec2::new(habitat.uniform(0.0, max_x), habitat.uniform(0.0, max_y));
        let velocity = random_heading(habitat);
        Self::base(AgentKind::Adult, size, position, velocity)
    }

    /// Build a juvenile at `position` bonded to `parent`.
    pub fn new_juvenile(
        position: Vec2,
        velocity: Vec2,
        parent: Option<AgentId>,
        size: f64,
    ) -> Self {
        let mut agent = Self::base(AgentKind::Juvenile, size, position, velocity);
        agent.juvenile = Some(JuvenileState {
            parent,
            ..JuvenileState::default()
        });
        agent
    }

    /// Whether this agent is an adult.
    pub const fn is_adult(&self) -> bool {
        matches!(self.kind, AgentKind::Adult)
    }

    /// Whether this juvenile is riding its parent.
    pub fn is_riding(&self) -> bool {
        self.juvenile.as_ref().is_some_and(|j| j.riding)
    }

    /// Whether this juvenile is fleeing the pointer.
    pub fn is_fleeing(&self) -> bool {
        self.juvenile.as_ref().is_some_and(|j| j.fleeing)
    }

    /// The recorded parent, if any.
    pub fn parent(&self) -> Option<AgentId> {
        self.juvenile.as_ref().and_then(|j| j.parent)
    }

    /// Start a new timed action, invalidating any older timer.
    pub const fn next_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Switch animation clip.
    pub fn set_animation(&mut self, animation: Animation) {
        self.animation.set(animation);
    }

    /// Walking if the velocity is meaningful, idle otherwise.
    pub fn settle_animation(&mut self) {
        let animation = if self.velocity.manhattan() > MOVING_THRESHOLD {
            Animation::Walking
        } else {
            Animation::Idle
        };
        self.set_animation(animation);
    }

    /// Advance the sprite animation.
    pub fn advance_animation(&mut self, elapsed_ms: f64) {
        self.animation.advance(elapsed_ms, self.sitting);
    }

    /// The single behavior label derived from the guard flags.
    pub fn mode(&self) -> BehaviorMode {
        let juvenile = self.juvenile.as_ref();
        if self.jumping {
            BehaviorMode::Jumping
        } else if juvenile.is_some_and(|j| j.riding) {
            BehaviorMode::Riding
        } else if juvenile.is_some_and(|j| j.fleeing) {
            BehaviorMode::Fleeing
        } else if self.laying {
            BehaviorMode::Laying
        } else if self.sitting {
            BehaviorMode::Sitting
        } else if self.pecking {
            BehaviorMode::Pecking
        } else if juvenile.is_some_and(|j| j.following_parent || j.approaching_parent) {
            BehaviorMode::FollowingParent
        } else if self.idling || self.animation.clip() == Animation::Idle {
            BehaviorMode::Idle
        } else {
            BehaviorMode::Walking
        }
    }

    /// Render view.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            facing_right: self.facing_right,
            frame: self.animation.frame(),
            animation: self.animation.clip(),
            mode: self.mode(),
        }
    }

    /// Clamp into the viewport.
    pub fn clamp_to(&mut self, habitat: &Habitat) {
        self.position = habitat.viewport.clamp(self.position, self.size);
    }

    /// Step `velocity` toward `target` at `speed`, face the way of travel,
    /// and clamp. Returns `false` (without moving) when already there.
    pub(crate) fn step_toward(&mut self, target: Vec2, speed: f64, habitat: &Habitat) -> bool {
        let Some(velocity) = self.position.toward(target, speed) else {
            return false;
        };
        self.velocity = velocity;
        self.facing_right = velocity.x > 0.0;
        self.position += velocity;
        self.clamp_to(habitat);
        true
    }

    /// Apply the current velocity and bounce off the viewport edges.
    pub(crate) fn step_reflecting(&mut self, habitat: &Habitat) {
        self.position += self.velocity;
        habitat
            .viewport
            .reflect(&mut self.position, &mut self.velocity, self.size);
    }

    /// Update facing from horizontal velocity, ignoring slow drift.
    pub(crate) fn face_velocity(&mut self, deadband: f64) {
        if self.velocity.x > deadband {
            self.facing_right = true;
        } else if self.velocity.x < -deadband {
            self.facing_right = false;
        }
    }
}

/// Combined speed below which an agent counts as standing still.
pub const MOVING_THRESHOLD: f64 = 0.1;

/// A random wander heading with each component kept at least
/// `min_velocity` away from zero.
pub fn random_heading(habitat: &mut Habitat) -> Vec2 {
    let AdultTunables {
        min_velocity,
        max_velocity,
        ..
    } = habitat.tunables.adult;
    let x = away_from_zero(habitat.jitter(max_velocity), min_velocity);
    let y = away_from_zero(habitat.jitter(max_velocity), min_velocity);
    Vec2::new(x, y)
}

fn away_from_zero(value: f64, min: f64) -> f64 {
    if value.abs() >= min {
        value
    } else if value >= 0.0 {
        min
    } else {
        -min
    }
}
