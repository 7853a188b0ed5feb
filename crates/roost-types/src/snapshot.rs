//! Render snapshots: the read-only view the presentation layer consumes.
//!
//! The simulation builds one [`FrameSnapshot`] per rendered frame. None of
//! these types carry behavior; they are plain data for serialization.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AgentKind, Animation, BehaviorMode, EggState, FeedLevel};
use crate::geometry::Vec2;
use crate::ids::{AgentId, EggId, FeedId};

/// Everything the renderer needs to draw one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// Agent identity.
    pub id: AgentId,
    /// Adult or juvenile (selects the sprite sheet).
    pub kind: AgentKind,
    /// Top-left corner of the sprite in viewport pixels.
    pub position: Vec2,
    /// Whether the sprite is mirrored to face right.
    pub facing_right: bool,
    /// Current sprite frame index.
    pub frame: u32,
    /// Active animation clip.
    pub animation: Animation,
    /// Primary behavior label.
    pub mode: BehaviorMode,
}

/// Everything the renderer needs to draw one egg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EggSnapshot {
    /// Egg identity.
    pub id: EggId,
    /// Top-left corner of the sprite in viewport pixels.
    pub position: Vec2,
    /// Lifecycle state.
    pub state: EggState,
    /// Current sprite frame index (0 intact, then the hatch frames).
    pub frame: u32,
    /// Whether an adult is currently sitting on it.
    pub occupied: bool,
}

/// Everything the renderer needs to draw one feed pile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedSnapshot {
    /// Pile identity.
    pub id: FeedId,
    /// Top-left corner of the sprite in viewport pixels.
    pub position: Vec2,
    /// Remaining amount.
    pub amount: u32,
    /// Amount the pile was placed with.
    pub initial_amount: u32,
    /// Sprite bucket for the remaining amount.
    pub level: FeedLevel,
}

/// Pointer state as last reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointerSnapshot {
    /// Pointer position in viewport pixels.
    pub position: Vec2,
    /// Whether the pointer is carrying a handful of feed.
    pub carrying_food: bool,
}

/// A complete picture of the barnyard at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FrameSnapshot {
    /// Tick number the frame was taken after.
    pub tick: u64,
    /// Agents in roster order.
    pub agents: Vec<AgentSnapshot>,
    /// Eggs in roster order.
    pub eggs: Vec<EggSnapshot>,
    /// Feed piles in placement order.
    pub feed: Vec<FeedSnapshot>,
    /// Pointer state.
    pub pointer: PointerSnapshot,
}
