//! Agent behavior, egg lifecycle, and the shared habitat for the Roost
//! simulation.
//!
//! This crate holds every rule an agent follows without knowing about the
//! roster as a whole. It sits between `roost-world` (bounds, feed, timers)
//! and `roost-core` (which owns the roster, runs the tick, and dispatches
//! deferred tasks).
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] record shared by adults and juveniles
//! - [`animation`] -- Sprite clips and the per-agent cursor
//! - [`behavior`] -- Shared wander loop and adult actions
//! - [`config`] -- Tunables for adults, juveniles, and eggs ([`Tunables`])
//! - [`egg`] -- Incubation and hatching ([`Egg`], [`EggRoster`])
//! - [`error`] -- Validation errors ([`AgentError`])
//! - [`habitat`] -- The world context agents read and mutate ([`Habitat`])
//! - [`juvenile`] -- Juvenile decision layer ([`ParentLink`])
//! - [`task`] -- Deferred transitions ([`Task`])

pub mod agent;
pub mod animation;
pub mod behavior;
pub mod config;
pub mod egg;
pub mod error;
pub mod habitat;
pub mod juvenile;
pub mod task;

pub use agent::{Agent, JuvenileState, random_heading};
pub use animation::{AnimationCursor, Clip};
pub use config::{AdultTunables, EggTunables, JuvenileTunables, Tunables};
pub use egg::{Egg, EggRoster, Hatchling};
pub use error::AgentError;
pub use habitat::Habitat;
pub use juvenile::{ParentLink, ParentView};
pub use task::Task;
