//! Shared type definitions for the Roost simulation.
//!
//! This crate is the single source of truth for the data that crosses
//! crate boundaries. Snapshot types flow downstream to `TypeScript` via
//! `ts-rs` for the browser renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, eggs, and feed piles
//! - [`enums`] -- Agent kind, behavior mode, animation, egg state, feed level
//! - [`geometry`] -- [`Vec2`] positions and velocities
//! - [`snapshot`] -- Per-frame render snapshots

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentKind, Animation, BehaviorMode, EggState, FeedLevel};
pub use geometry::Vec2;
pub use ids::{AgentId, EggId, FeedId};
pub use snapshot::{AgentSnapshot, EggSnapshot, FeedSnapshot, FrameSnapshot, PointerSnapshot};

#[cfg(test)]
mod tests {
    //! Binding generation for the renderer.

    #[test]
    fn export_bindings() {
        // Files land in `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::EggId::export_all();
        let _ = crate::ids::FeedId::export_all();

        let _ = crate::enums::AgentKind::export_all();
        let _ = crate::enums::BehaviorMode::export_all();
        let _ = crate::enums::Animation::export_all();
        let _ = crate::enums::EggState::export_all();
        let _ = crate::enums::FeedLevel::export_all();

        let _ = crate::geometry::Vec2::export_all();

        let _ = crate::snapshot::AgentSnapshot::export_all();
        let _ = crate::snapshot::EggSnapshot::export_all();
        let _ = crate::snapshot::FeedSnapshot::export_all();
        let _ = crate::snapshot::PointerSnapshot::export_all();
        let _ = crate::snapshot::FrameSnapshot::export_all();
    }
}
