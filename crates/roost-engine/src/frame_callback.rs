//! Tick callback that publishes render frames.
//!
//! Every `every` ticks the callback encodes the barnyard's frame snapshot as
//! JSON and keeps the latest one for a renderer to pick up.

use roost_core::{Simulation, TickCallback, TickSummary};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Encode the current frame as JSON.
pub fn encode_frame(simulation: &Simulation) -> Result<String, EngineError> {
    Ok(serde_json::to_string(&simulation.frame())?)
}

/// Callback that keeps the most recent encoded frame.
pub struct FrameCallback {
    every: u64,
    latest: Option<String>,
    published: u64,
}

impl FrameCallback {
    /// Publish a frame every `every` ticks (0 = never).
    pub const fn new(every: u64) -> Self {
        Self {
            every,
            latest: None,
            published: 0,
        }
    }

    /// The last frame published, if any.
    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// Frames published so far.
    pub const fn published(&self) -> u64 {
        self.published
    }
}

impl TickCallback for FrameCallback {
    fn on_tick(&mut self, summary: &TickSummary, simulation: &Simulation) {
        if summary.tick.checked_rem(self.every) != Some(0) {
            return;
        }
        match encode_frame(simulation) {
            Ok(json) => {
                debug!(tick = summary.tick, bytes = json.len(), "Frame published");
                self.latest = Some(json);
                self.published = self.published.saturating_add(1);
            }
            Err(error) => warn!(tick = summary.tick, %error, "Frame encoding failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roost_core::SimulationConfig;

    use super::*;

    fn simulation() -> Simulation {
        let mut config = SimulationConfig::default();
        config.world.seed = Some(1);
        config.world.initial_population = 3;
        Simulation::from_config(&config).unwrap()
    }

    #[test]
    fn publishes_on_the_interval() {
        let mut sim = simulation();
        let mut callback = FrameCallback::new(2);
        for _ in 0..5 {
            let summary = sim.tick(16.0).unwrap();
            callback.on_tick(&summary, &sim);
        }
        assert_eq!(callback.published(), 2);
        let frame: serde_json::Value = serde_json::from_str(callback.latest().unwrap()).unwrap();
        assert_eq!(frame["tick"], 4);
        assert_eq!(frame["agents"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn zero_interval_never_publishes() {
        let mut sim = simulation();
        let mut callback = FrameCallback::new(0);
        let summary = sim.tick(16.0).unwrap();
        callback.on_tick(&summary, &sim);
        assert!(callback.latest().is_none());
    }
}
