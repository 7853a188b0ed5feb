//! World state shared by every agent in the Roost simulation.
//!
//! Agents never own the world. They read it and request changes through
//! the methods here.
//!
//! # Modules
//!
//! - [`viewport`] -- Bounds, clamping, and edge reflection
//! - [`pointer`] -- Pointer position and carried feed
//! - [`feed`] -- Feed piles and the [`FeedRegistry`]
//! - [`scheduler`] -- Virtual-time queue for deferred transitions
//! - [`error`] -- Construction and configuration errors

pub mod error;
pub mod feed;
pub mod pointer;
pub mod scheduler;
pub mod viewport;

pub use error::WorldError;
pub use feed::{FeedPile, FeedRegistry, FeedTunables};
pub use pointer::PointerState;
pub use scheduler::Scheduler;
pub use viewport::{Bounce, Viewport};
