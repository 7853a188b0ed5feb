//! Tunables for adults, juveniles, and eggs.
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides. [`Tunables::validate`] runs once at startup; the
//! behavior code assumes the ranges it checks.
//!
//! Distances are pixels, speeds are pixels per tick, durations are
//! milliseconds, and chances are per-tick probabilities in `[0, 1]`.

use roost_world::FeedTunables;
use serde::Deserialize;

use crate::error::AgentError;

/// Every tunable the simulation reads, grouped by entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Adult behavior. Juveniles share the wander parameters.
    pub adult: AdultTunables,
    /// Juvenile-only behavior.
    pub juvenile: JuvenileTunables,
    /// Egg incubation and hatching.
    pub egg: EggTunables,
    /// Feed piles.
    pub feed: FeedTunables,
}

impl Tunables {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`] found.
    pub fn validate(&self) -> Result<(), AgentError> {
        self.adult.validate()?;
        self.juvenile.validate()?;
        self.egg.validate()?;
        self.feed.validate()?;
        Ok(())
    }
}

/// Adult parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdultTunables {
    /// Sprite size.
    pub size: f64,
    /// Smallest magnitude of each heading component.
    pub min_velocity: f64,
    /// Spread of a random heading component, `(r - 0.5) * max_velocity`.
    pub max_velocity: f64,
    /// Chance to pick a new heading.
    pub direction_change_chance: f64,
    /// Chance to stop and peck at the ground.
    pub peck_chance: f64,
    /// How long a peck freezes the agent.
    pub peck_duration_ms: f64,
    /// Chance to start an idle pause.
    pub idle_chance: f64,
    /// Shortest idle pause.
    pub idle_min_ms: f64,
    /// Longest idle pause.
    pub idle_max_ms: f64,
    /// Length of a hover jump.
    pub jump_duration_ms: f64,
    /// Peak height of the jump arc.
    pub jump_height: f64,
    /// Horizontal reach of the jump arc.
    pub jump_distance: f64,
    /// Pointer distance at which following starts.
    pub follow_distance: f64,
    /// Pointer distance beyond which following stops.
    pub unfollow_distance: f64,
    /// Speed while following the pointer.
    pub mouse_follow_speed: f64,
    /// Feed scan radius as a fraction of the smaller viewport dimension.
    pub feed_detection_radius: f64,
    /// Distance at which feed (or the pointer) counts as reached.
    pub feed_reach_distance: f64,
    /// Speed while rushing to feed.
    pub feed_speed: f64,
    /// Chance to lose interest in a pile after each peck.
    pub feed_release_chance: f64,
    /// Chance to lay an egg once the cooldown has passed.
    pub egg_lay_chance: f64,
    /// Minimum time between two lays by the same adult.
    pub egg_cooldown_ms: f64,
    /// How long laying takes.
    pub lay_duration_ms: f64,
    /// Vertical offset of a new egg below the layer.
    pub egg_drop_offset: f64,
    /// Chance to claim a nearby free egg.
    pub egg_sit_chance: f64,
    /// Radius within which an egg can be claimed.
    pub egg_sit_distance: f64,
    /// How far above the egg a sitting adult is drawn.
    pub egg_sit_offset: f64,
    /// Spread of the scatter applied when standing up.
    pub stand_scatter: f64,
    /// Delay before the post-sitting nudge.
    pub nudge_delay_ms: f64,
    /// Velocity multiplier for the post-sitting nudge.
    pub nudge_factor: f64,
    /// Horizontal speed below which facing does not change.
    pub facing_deadband: f64,
}

impl Default for AdultTunables {
    fn default() -> Self {
        Self {
            size: 32.0,
            min_velocity: 0.5,
            max_velocity: 2.0,
            direction_change_chance: 0.01,
            peck_chance: 0.005,
            peck_duration_ms: 600.0,
            idle_chance: 0.003,
            idle_min_ms: 1000.0,
            idle_max_ms: 5000.0,
            jump_duration_ms: 800.0,
            jump_height: 60.0,
            jump_distance: 40.0,
            follow_distance: 100.0,
            unfollow_distance: 150.0,
            mouse_follow_speed: 1.5,
            feed_detection_radius: 0.25,
            feed_reach_distance: 20.0,
            feed_speed: 2.0,
            feed_release_chance: 0.3,
            egg_lay_chance: 0.0001,
            egg_cooldown_ms: 30_000.0,
            lay_duration_ms: 1500.0,
            egg_drop_offset: 16.0,
            egg_sit_chance: 0.01,
            egg_sit_distance: 30.0,
            egg_sit_offset: 8.0,
            stand_scatter: 30.0,
            nudge_delay_ms: 100.0,
            nudge_factor: 5.0,
            facing_deadband: 0.1,
        }
    }
}

impl AdultTunables {
    fn validate(&self) -> Result<(), AgentError> {
        let check = Check::new("adult");
        check.positive("size", self.size)?;
        check.non_negative("min_velocity", self.min_velocity)?;
        check.non_negative("max_velocity", self.max_velocity)?;
        check.probability("direction_change_chance", self.direction_change_chance)?;
        check.probability("peck_chance", self.peck_chance)?;
        check.non_negative("peck_duration_ms", self.peck_duration_ms)?;
        check.probability("idle_chance", self.idle_chance)?;
        check.ordered("idle_min_ms", self.idle_min_ms, "idle_max_ms", self.idle_max_ms)?;
        check.positive("jump_duration_ms", self.jump_duration_ms)?;
        check.non_negative("jump_height", self.jump_height)?;
        check.non_negative("jump_distance", self.jump_distance)?;
        check.ordered(
            "follow_distance",
            self.follow_distance,
            "unfollow_distance",
            self.unfollow_distance,
        )?;
        check.non_negative("mouse_follow_speed", self.mouse_follow_speed)?;
        check.non_negative("feed_detection_radius", self.feed_detection_radius)?;
        check.non_negative("feed_reach_distance", self.feed_reach_distance)?;
        check.non_negative("feed_speed", self.feed_speed)?;
        check.probability("feed_release_chance", self.feed_release_chance)?;
        check.probability("egg_lay_chance", self.egg_lay_chance)?;
        check.non_negative("egg_cooldown_ms", self.egg_cooldown_ms)?;
        check.non_negative("lay_duration_ms", self.lay_duration_ms)?;
        check.finite("egg_drop_offset", self.egg_drop_offset)?;
        check.probability("egg_sit_chance", self.egg_sit_chance)?;
        check.non_negative("egg_sit_distance", self.egg_sit_distance)?;
        check.finite("egg_sit_offset", self.egg_sit_offset)?;
        check.non_negative("stand_scatter", self.stand_scatter)?;
        check.non_negative("nudge_delay_ms", self.nudge_delay_ms)?;
        check.non_negative("nudge_factor", self.nudge_factor)?;
        check.non_negative("facing_deadband", self.facing_deadband)
    }
}

/// Juvenile parameters layered over the shared adult wander.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JuvenileTunables {
    /// Sprite size.
    pub size: f64,
    /// Speed while fleeing the pointer.
    pub run_away_speed: f64,
    /// Longest a flee lasts.
    pub run_away_duration_ms: f64,
    /// Pointer distance that ends a flee early.
    pub run_away_stop_distance: f64,
    /// Beyond this distance the juvenile always follows its parent.
    pub follow_parent_distance: f64,
    /// Beyond this distance the juvenile sometimes drifts toward its parent.
    pub close_follow_distance: f64,
    /// Following stops within this distance.
    pub follow_stop_distance: f64,
    /// Chance per tick to drift toward a nearby parent.
    pub follow_drift_chance: f64,
    /// Speed while following the parent.
    pub parent_follow_speed: f64,
    /// Chance to mount a close parent.
    pub riding_chance: f64,
    /// Chance per tick to dismount.
    pub riding_stop_chance: f64,
    /// Shortest ride before the timeout check.
    pub ride_min_ms: f64,
    /// Longest ride before the timeout check.
    pub ride_max_ms: f64,
    /// Chance to dismount when the ride timeout fires.
    pub ride_timeout_dismount_chance: f64,
    /// Distance within which the parent can be mounted.
    pub mount_distance: f64,
    /// Horizontal offset from the parent while riding.
    pub ride_offset_x: f64,
    /// Vertical offset from the parent while riding.
    pub ride_offset_y: f64,
    /// Spread of the scatter applied when dismounting.
    pub dismount_scatter: f64,
    /// Distance to a sitting parent that starts an approach.
    pub sitting_parent_distance: f64,
    /// Distance to a sitting parent at which the approach stops.
    pub sitting_parent_target_distance: f64,
    /// Speed while approaching a sitting parent.
    pub sitting_parent_speed: f64,
}

impl Default for JuvenileTunables {
    fn default() -> Self {
        Self {
            size: 16.0,
            run_away_speed: 4.0,
            run_away_duration_ms: 3000.0,
            run_away_stop_distance: 100.0,
            follow_parent_distance: 80.0,
            close_follow_distance: 45.0,
            follow_stop_distance: 40.0,
            follow_drift_chance: 0.1,
            parent_follow_speed: 1.8,
            riding_chance: 0.003,
            riding_stop_chance: 0.002,
            ride_min_ms: 1500.0,
            ride_max_ms: 3500.0,
            ride_timeout_dismount_chance: 0.8,
            mount_distance: 15.0,
            ride_offset_x: 2.0,
            ride_offset_y: -8.0,
            dismount_scatter: 20.0,
            sitting_parent_distance: 60.0,
            sitting_parent_target_distance: 50.0,
            sitting_parent_speed: 1.0,
        }
    }
}

impl JuvenileTunables {
    fn validate(&self) -> Result<(), AgentError> {
        let check = Check::new("juvenile");
        check.positive("size", self.size)?;
        check.non_negative("run_away_speed", self.run_away_speed)?;
        check.non_negative("run_away_duration_ms", self.run_away_duration_ms)?;
        check.non_negative("run_away_stop_distance", self.run_away_stop_distance)?;
        check.ordered(
            "close_follow_distance",
            self.close_follow_distance,
            "follow_parent_distance",
            self.follow_parent_distance,
        )?;
        check.non_negative("follow_stop_distance", self.follow_stop_distance)?;
        check.probability("follow_drift_chance", self.follow_drift_chance)?;
        check.non_negative("parent_follow_speed", self.parent_follow_speed)?;
        check.probability("riding_chance", self.riding_chance)?;
        check.probability("riding_stop_chance", self.riding_stop_chance)?;
        check.ordered("ride_min_ms", self.ride_min_ms, "ride_max_ms", self.ride_max_ms)?;
        check.probability(
            "ride_timeout_dismount_chance",
            self.ride_timeout_dismount_chance,
        )?;
        check.non_negative("mount_distance", self.mount_distance)?;
        check.finite("ride_offset_x", self.ride_offset_x)?;
        check.finite("ride_offset_y", self.ride_offset_y)?;
        check.non_negative("dismount_scatter", self.dismount_scatter)?;
        check.ordered(
            "sitting_parent_target_distance",
            self.sitting_parent_target_distance,
            "sitting_parent_distance",
            self.sitting_parent_distance,
        )?;
        check.non_negative("sitting_parent_speed", self.sitting_parent_speed)
    }
}

/// Egg incubation and hatching parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EggTunables {
    /// Sprite size.
    pub size: f64,
    /// Incubation needed before the egg hatches.
    pub sitting_required_ms: f64,
    /// Delay between hatch frames.
    pub hatching_frame_delay_ms: f64,
    /// How long the empty shell stays after hatching.
    pub shell_remove_delay_ms: f64,
    /// Delay between the incubator standing up and hatching starting.
    pub move_away_delay_ms: f64,
    /// Sprite frames shown while hatching; the last one is the empty shell.
    pub hatch_frames: Vec<u32>,
    /// Radius searched for a substitute parent when the incubator is gone.
    pub parent_search_radius: f64,
    /// Spread of the hatchling's offset from the egg.
    pub hatchling_scatter: f64,
    /// Spread of each hatchling velocity component.
    pub hatchling_velocity: f64,
}

impl Default for EggTunables {
    fn default() -> Self {
        Self {
            size: 16.0,
            sitting_required_ms: 10_000.0,
            hatching_frame_delay_ms: 800.0,
            shell_remove_delay_ms: 2000.0,
            move_away_delay_ms: 2000.0,
            hatch_frames: vec![1, 2, 3, 4],
            parent_search_radius: 80.0,
            hatchling_scatter: 10.0,
            hatchling_velocity: 1.5,
        }
    }
}

impl EggTunables {
    fn validate(&self) -> Result<(), AgentError> {
        let check = Check::new("egg");
        check.positive("size", self.size)?;
        check.non_negative("sitting_required_ms", self.sitting_required_ms)?;
        check.non_negative("hatching_frame_delay_ms", self.hatching_frame_delay_ms)?;
        check.non_negative("shell_remove_delay_ms", self.shell_remove_delay_ms)?;
        check.non_negative("move_away_delay_ms", self.move_away_delay_ms)?;
        if self.hatch_frames.len() < 2 {
            return Err(check.fail(
                "hatch_frames",
                format!(
                    "needs at least two frames (cracking and empty shell), got {}",
                    self.hatch_frames.len()
                ),
            ));
        }
        check.non_negative("parent_search_radius", self.parent_search_radius)?;
        check.non_negative("hatchling_scatter", self.hatchling_scatter)?;
        check.non_negative("hatchling_velocity", self.hatchling_velocity)
    }
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

struct Check {
    section: &'static str,
}

impl Check {
    const fn new(section: &'static str) -> Self {
        Self { section }
    }

    const fn fail(&self, name: &'static str, reason: String) -> AgentError {
        AgentError::InvalidTunable {
            section: self.section,
            name,
            reason,
        }
    }

    fn finite(&self, name: &'static str, value: f64) -> Result<(), AgentError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(self.fail(name, format!("must be finite, got {value}")))
        }
    }

    fn non_negative(&self, name: &'static str, value: f64) -> Result<(), AgentError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(self.fail(name, format!("must be finite and >= 0, got {value}")))
        }
    }

    fn positive(&self, name: &'static str, value: f64) -> Result<(), AgentError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(self.fail(name, format!("must be finite and > 0, got {value}")))
        }
    }

    fn probability(&self, name: &'static str, value: f64) -> Result<(), AgentError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(self.fail(name, format!("must be within [0, 1], got {value}")))
        }
    }

    fn ordered(
        &self,
        low_name: &'static str,
        low: f64,
        high_name: &'static str,
        high: f64,
    ) -> Result<(), AgentError> {
        self.non_negative(low_name, low)?;
        self.non_negative(high_name, high)?;
        if low <= high {
            Ok(())
        } else {
            Err(self.fail(
                high_name,
                format!("must be >= {low_name} ({low}), got {high}"),
            ))
        }
    }
}
