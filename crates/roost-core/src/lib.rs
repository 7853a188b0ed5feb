//! Simulation driver for the Roost barnyard.
//!
//! This crate owns the agent roster and everything that touches more than
//! one agent at a time: the clock, the tick pass, deferred task dispatch,
//! host input events, render frames, configuration, and the async run loop.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and virtual time ([`SimulationClock`])
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`control`] -- Stop and tick bounds for a running loop ([`RunControl`])
//! - [`runner`] -- The async tick loop ([`run_simulation`])
//! - [`simulation`] -- Roster, habitat, and input events ([`Simulation`])
//! - [`tick`] -- The per-tick pass ([`TickSummary`])

pub mod clock;
pub mod config;
pub mod control;
mod dispatch;
pub mod runner;
pub mod simulation;
mod snapshot;
pub mod tick;

pub use clock::{ClockError, SimulationClock};
pub use config::{ConfigError, SimulationConfig};
pub use control::{EndReason, RunControl};
pub use runner::{
    NoOpCallback, RunnerError, SimulationResult, TickCallback, log_simulation_end, run_simulation,
};
pub use simulation::Simulation;
pub use tick::{TickError, TickSummary};
