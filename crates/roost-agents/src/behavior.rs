//! Shared wander loop and adult actions.
//!
//! Each tick an agent works down a fixed priority list and stops at the
//! first rule that claims the tick:
//!
//! ```text
//! jumping > pecking/laying > sitting > pointer interest > egg to sit on
//!   > egg to lay > feed pursuit > pointer following > feed scan
//!   > idle pause > free wander
//! ```
//!
//! Juveniles run the same list after their own layer (see
//! [`crate::juvenile`]) but never lay or sit on eggs.
//!
//! Timed actions (pecks, laying, the post-sitting nudge) queue a [`Task`]
//! and finish in the matching `finish_*` handler when it fires.

use std::f64::consts::PI;

use roost_types::{Animation, EggId, FeedId, Vec2};
use tracing::debug;

use crate::agent::{Agent, random_heading};
use crate::animation::SITTING_FRAME;
use crate::habitat::Habitat;
use crate::task::Task;

impl Agent {
    // -----------------------------------------------------------------------
    // Per-tick entry points
    // -----------------------------------------------------------------------

    /// Run the shared wander rules for one tick.
    pub fn wander(&mut self, elapsed_ms: f64, habitat: &mut Habitat) {
        if self.jumping {
            self.update_jump(elapsed_ms, habitat);
            return;
        }
        if self.pecking || self.laying {
            return;
        }
        if self.sitting {
            self.set_animation(Animation::Sitting);
            return;
        }

        self.check_pointer_interest(habitat);

        if self.is_adult() {
            if self.try_sit_on_nearby_egg(habitat) {
                return;
            }
            if self.lay_cooldown_passed(habitat) && habitat.roll(habitat.tunables.adult.egg_lay_chance)
            {
                self.lay_egg(habitat);
                return;
            }
        }

        if self.target_feed.is_some() {
            self.move_toward_feed(habitat);
            return;
        }
        if self.following_pointer {
            self.follow_pointer(habitat);
            return;
        }
        self.scan_for_feed(habitat);

        if self.idling {
            self.idle_elapsed_ms += elapsed_ms;
            if self.idle_elapsed_ms < self.idle_duration_ms {
                return;
            }
            self.idling = false;
            self.idle_elapsed_ms = 0.0;
            self.velocity = random_heading(habitat);
        }

        let tunables = &habitat.tunables.adult;
        let (turn, peck, idle) = (
            tunables.direction_change_chance,
            tunables.peck_chance,
            tunables.idle_chance,
        );
        if habitat.roll(turn) {
            self.velocity = random_heading(habitat);
        }
        if habitat.roll(peck) {
            self.start_ground_peck(habitat);
            return;
        }
        if habitat.roll(idle) {
            self.start_idle(habitat);
            return;
        }

        self.step_reflecting(habitat);
        self.face_velocity(habitat.tunables.adult.facing_deadband);
        self.settle_animation();
    }

    /// Feed the current sitting egg. Returns `true` on the tick incubation
    /// completes, after the agent has stood up.
    pub fn update_sitting(&mut self, elapsed_ms: f64, habitat: &mut Habitat) -> bool {
        if !self.sitting {
            return false;
        }
        let Some(egg_id) = self.sitting_egg else {
            self.stop_sitting(habitat);
            return false;
        };
        let progress = {
            let Habitat {
                eggs,
                scheduler,
                tunables,
                ..
            } = &mut *habitat;
            match eggs.get_mut(egg_id) {
                Some(egg) if egg.sitter() == Some(self.id) => {
                    Some(egg.update_sitting(elapsed_ms, &tunables.egg, scheduler))
                }
                _ => None,
            }
        };
        match progress {
            Some(false) => false,
            Some(true) => {
                self.stop_sitting(habitat);
                true
            }
            // Egg gone or claimed by someone else: stand up.
            None => {
                self.stop_sitting(habitat);
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hover jump
    // -----------------------------------------------------------------------

    /// Start a hover jump. Returns `false` if the agent is busy.
    pub fn jump(&mut self) -> bool {
        if self.jumping || self.pecking || self.sitting || self.laying {
            return false;
        }
        self.jumping = true;
        self.idling = false;
        self.jump.progress = 0.0;
        self.jump.start_y = self.position.y;
        self.set_animation(Animation::Jumping);
        true
    }

    fn update_jump(&mut self, elapsed_ms: f64, habitat: &Habitat) {
        let tunables = &habitat.tunables.adult;
        self.jump.progress += elapsed_ms / tunables.jump_duration_ms;
        if self.jump.progress >= 1.0 {
            self.jumping = false;
            self.jump.progress = 0.0;
            self.position.y = self.jump.start_y;
            self.clamp_to(habitat);
            self.settle_animation();
            return;
        }
        let progress = self.jump.progress;
        let lift = tunables.jump_height * (progress * PI).sin();
        let drift = tunables.jump_distance * progress / 20.0;
        self.position.y = self.jump.start_y - lift;
        self.position.x += if self.facing_right { drift } else { -drift };
        self.clamp_to(habitat);
    }

    // -----------------------------------------------------------------------
    // Pointer interest
    // -----------------------------------------------------------------------

    fn check_pointer_interest(&mut self, habitat: &Habitat) {
        if !habitat.pointer.has_food() {
            self.following_pointer = false;
            return;
        }
        let tunables = &habitat.tunables.adult;
        let distance = self.position.distance_to(habitat.pointer.position());
        if !self.following_pointer && distance <= tunables.follow_distance {
            self.following_pointer = true;
            self.idling = false;
        } else if self.following_pointer && distance > tunables.unfollow_distance {
            self.following_pointer = false;
        }
    }

    fn follow_pointer(&mut self, habitat: &Habitat) {
        let tunables = &habitat.tunables.adult;
        let target = habitat.pointer.position();
        if self.position.distance_to(target) <= tunables.feed_reach_distance {
            return;
        }
        if self.step_toward(target, tunables.mouse_follow_speed, habitat) {
            self.set_animation(Animation::Walking);
        }
    }

    // -----------------------------------------------------------------------
    // Feed
    // -----------------------------------------------------------------------

    /// Drop everything and head for `feed`.
    ///
    /// Ignored while sitting, pecking, laying, or riding. Returns whether
    /// the agent took the target.
    pub fn rush_to_feed(&mut self, feed: FeedId) -> bool {
        if self.sitting || self.pecking || self.laying || self.is_riding() {
            return false;
        }
        self.target_feed = Some(feed);
        self.following_pointer = false;
        self.idling = false;
        if let Some(juvenile) = self.juvenile.as_mut() {
            juvenile.fleeing = false;
            juvenile.flee_elapsed_ms = 0.0;
        }
        true
    }

    fn scan_for_feed(&mut self, habitat: &Habitat) {
        let radius = habitat.viewport.min_dimension() * habitat.tunables.adult.feed_detection_radius;
        if let Some(feed) = habitat.feed.nearest_within(self.position, radius) {
            self.rush_to_feed(feed);
        }
    }

    fn move_toward_feed(&mut self, habitat: &mut Habitat) {
        let Some(target) = self
            .target_feed
            .and_then(|id| habitat.feed.get(id))
            .map(|pile| (pile.id, pile.position))
        else {
            self.target_feed = None;
            return;
        };
        let (feed, position) = target;
        let tunables = &habitat.tunables.adult;
        if self.position.distance_to(position) <= tunables.feed_reach_distance {
            self.peck_at_feed(feed, habitat);
        } else if self.step_toward(position, tunables.feed_speed, habitat) {
            self.set_animation(Animation::Walking);
        }
    }

    fn peck_at_feed(&mut self, feed: FeedId, habitat: &mut Habitat) {
        if self.pecking {
            return;
        }
        self.pecking = true;
        self.set_animation(Animation::Pecking);
        let epoch = self.next_epoch();
        let feed_gone = habitat.feed.consume(feed);
        habitat.scheduler.schedule(
            habitat.tunables.adult.peck_duration_ms,
            Task::FinishFeedPeck {
                agent: self.id,
                epoch,
                feed_gone,
            },
        );
    }

    /// A feed peck is over: maybe lose interest, then stand idle.
    pub fn finish_feed_peck(&mut self, epoch: u64, feed_gone: bool, habitat: &mut Habitat) {
        if epoch != self.epoch || !self.pecking {
            return;
        }
        self.pecking = false;
        if feed_gone || habitat.roll(habitat.tunables.adult.feed_release_chance) {
            self.target_feed = None;
            self.velocity = random_heading(habitat);
        }
        self.set_animation(Animation::Idle);
    }

    // -----------------------------------------------------------------------
    // Ground pecks and idling
    // -----------------------------------------------------------------------

    fn start_ground_peck(&mut self, habitat: &mut Habitat) {
        self.pecking = true;
        self.set_animation(Animation::Pecking);
        let epoch = self.next_epoch();
        habitat.scheduler.schedule(
            habitat.tunables.adult.peck_duration_ms,
            Task::ResumeAfterPeck {
                agent: self.id,
                epoch,
            },
        );
    }

    /// A ground peck is over.
    pub fn finish_ground_peck(&mut self, epoch: u64) {
        if epoch != self.epoch || !self.pecking {
            return;
        }
        self.pecking = false;
        if !self.jumping && !self.idling {
            self.settle_animation();
        }
    }

    fn start_idle(&mut self, habitat: &mut Habitat) {
        let (min, max) = (habitat.tunables.adult.idle_min_ms, habitat.tunables.adult.idle_max_ms);
        self.idling = true;
        self.idle_elapsed_ms = 0.0;
        self.idle_duration_ms = habitat.uniform(min, max);
        self.set_animation(Animation::Idle);
    }

    // -----------------------------------------------------------------------
    // Laying
    // -----------------------------------------------------------------------

    fn lay_cooldown_passed(&self, habitat: &Habitat) -> bool {
        self.last_egg_ms.is_none_or(|last| {
            habitat.now_ms() - last > habitat.tunables.adult.egg_cooldown_ms
        })
    }

    fn lay_egg(&mut self, habitat: &mut Habitat) {
        self.laying = true;
        self.idling = false;
        self.set_animation(Animation::Sitting);
        self.animation.reset_to(SITTING_FRAME);
        self.last_egg_ms = Some(habitat.now_ms());
        let epoch = self.next_epoch();
        debug!(agent_id = %self.id, "Laying started");
        habitat.scheduler.schedule(
            habitat.tunables.adult.lay_duration_ms,
            Task::FinishLaying {
                agent: self.id,
                epoch,
            },
        );
    }

    /// Laying is over: drop exactly one egg below the agent.
    pub fn finish_laying(&mut self, epoch: u64, habitat: &mut Habitat) -> Option<EggId> {
        if epoch != self.epoch || !self.laying {
            return None;
        }
        let offset = habitat.tunables.adult.egg_drop_offset;
        let egg_size = habitat.tunables.egg.size;
        let spot = habitat
            .viewport
            .clamp(self.position + Vec2::new(0.0, offset), egg_size);
        let egg = habitat.eggs.lay(spot);
        self.laying = false;
        self.set_animation(Animation::Idle);
        self.animation.reset_to(0);
        self.velocity = random_heading(habitat);
        Some(egg)
    }

    // -----------------------------------------------------------------------
    // Sitting on eggs
    // -----------------------------------------------------------------------

    fn try_sit_on_nearby_egg(&mut self, habitat: &mut Habitat) -> bool {
        let distance = habitat.tunables.adult.egg_sit_distance;
        let Some(egg) = habitat.eggs.first_available_within(self.position, distance) else {
            return false;
        };
        if !habitat.roll(habitat.tunables.adult.egg_sit_chance) {
            return false;
        }
        self.start_sitting_on(egg, habitat)
    }

    /// Claim `egg` and settle on it. Returns `false` if the egg refused.
    pub fn start_sitting_on(&mut self, egg: EggId, habitat: &mut Habitat) -> bool {
        if !self.is_adult() || self.sitting {
            return false;
        }
        let Some(target) = habitat.eggs.get_mut(egg) else {
            return false;
        };
        if !target.start_sitting(self.id) {
            return false;
        }
        let spot = target.position() - Vec2::new(0.0, habitat.tunables.adult.egg_sit_offset);
        self.sitting = true;
        self.sitting_egg = Some(egg);
        self.idling = false;
        self.following_pointer = false;
        self.set_animation(Animation::Sitting);
        self.position = spot;
        self.clamp_to(habitat);
        true
    }

    /// Stand up from an egg: scatter, pick a heading, and queue a nudge.
    pub fn stop_sitting(&mut self, habitat: &mut Habitat) {
        if let Some(egg) = self.sitting_egg.take() {
            if let Some(egg) = habitat.eggs.get_mut(egg) {
                egg.release(self.id);
            }
        }
        self.sitting = false;
        self.set_animation(Animation::Idle);
        self.animation.reset_to(0);

        let scatter = habitat.tunables.adult.stand_scatter;
        let offset = Vec2::new(habitat.jitter(scatter), habitat.jitter(scatter));
        self.position += offset;
        self.clamp_to(habitat);
        self.velocity = random_heading(habitat);
        habitat.scheduler.schedule(
            habitat.tunables.adult.nudge_delay_ms,
            Task::SettleAfterSit { agent: self.id },
        );
    }

    /// Step away from the egg unless the agent got busy again.
    pub fn settle_after_sit(&mut self, habitat: &Habitat) {
        if self.sitting || self.laying || self.pecking {
            return;
        }
        self.position += self.velocity * habitat.tunables.adult.nudge_factor;
        self.clamp_to(habitat);
    }
}
