//! Enumeration types for the Roost simulation.
//!
//! Every enum here crosses the boundary to the renderer, so variants
//! serialize as `snake_case` labels that double as sprite lookup keys.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Which variant of creature an agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AgentKind {
    /// A grown bird: forages, lays eggs, and sits on them.
    Adult,
    /// A hatchling: flees the pointer, follows and rides its parent.
    Juvenile,
}

/// The primary behavior an agent is showing this frame.
///
/// Modes are mutually exclusive and derived from the agent's guard flags
/// in a fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BehaviorMode {
    /// Standing still (idle pause or nothing to do).
    Idle,
    /// Moving: free wander, feed pursuit, or following the pointer.
    Walking,
    /// Frozen in a peck.
    Pecking,
    /// Mid-air on a jump arc.
    Jumping,
    /// Incubating an egg.
    Sitting,
    /// Frozen while laying an egg.
    Laying,
    /// Running away from the pointer (juveniles only).
    Fleeing,
    /// Pinned on top of the parent (juveniles only).
    Riding,
    /// Walking toward the parent (juveniles only).
    FollowingParent,
}

impl BehaviorMode {
    /// Stable label used by the renderer to select a sprite sheet row.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Pecking => "pecking",
            Self::Jumping => "jumping",
            Self::Sitting => "sitting",
            Self::Laying => "laying",
            Self::Fleeing => "fleeing",
            Self::Riding => "riding",
            Self::FollowingParent => "following_parent",
        }
    }
}

/// An animation clip name.
///
/// Each agent kind maps clips to its own frame list; a kind without a
/// clip for a name simply keeps its current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Animation {
    /// Standing.
    Idle,
    /// Walking cycle.
    Walking,
    /// Pecking at the ground.
    Pecking,
    /// Jump arc.
    Jumping,
    /// Sitting or laying pose.
    Sitting,
    /// Fast run when fleeing.
    Running,
    /// Perched on the parent.
    Riding,
}

// ---------------------------------------------------------------------------
// Eggs
// ---------------------------------------------------------------------------

/// Lifecycle of an egg. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EggState {
    /// Laid, waiting for (or under) an incubating adult.
    Waiting,
    /// Cracking open through the hatch frames.
    Hatching,
    /// The juvenile is out; only the shell remains until removal.
    Hatched,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// Coarse remaining-amount bucket of a feed pile, used for its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FeedLevel {
    /// More than the full threshold remains.
    Full,
    /// Between the half and full thresholds.
    Half,
    /// Some feed remains, below the half threshold.
    Low,
}
