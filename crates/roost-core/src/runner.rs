//! Async tick loop with run controls.
//!
//! [`run_simulation`] drives [`Simulation::tick`] at the cadence held in
//! [`RunControl`], feeding each tick the real time that passed since the
//! previous one. It supports:
//!
//! - **Bounded runs**: stop after `max_ticks`
//! - **Clean stop**: the host requests a stop and gets a final summary

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

use crate::control::{EndReason, RunControl};
use crate::simulation::Simulation;
use crate::tick::{TickError, TickSummary};

/// Errors that can occur during the run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Outcome of a run.
#[derive(Debug)]
pub struct SimulationResult {
    /// Why the run ended.
    pub end_reason: EndReason,
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed by this run.
    pub total_ticks: u64,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end.
    pub ended_at: DateTime<Utc>,
}

/// Hook invoked after every tick, typically to publish a frame.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, simulation: &Simulation);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _simulation: &Simulation) {}
}

/// Run the tick loop until the tick limit or a stop request.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub async fn run_simulation(
    simulation: &mut Simulation,
    control: &Arc<RunControl>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let started_at = Utc::now();
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut last_instant = Instant::now();

    info!(
        max_ticks = control.max_ticks(),
        tick_interval_ms = control.tick_interval_ms(),
        agents = simulation.agents().len(),
        "Simulation starting"
    );

    let end_reason = loop {
        // --- Stop ---
        if control.is_stop_requested() {
            info!("Stop requested");
            break EndReason::Stopped;
        }

        // --- Tick ---
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_instant).as_secs_f64() * 1_000.0;
        last_instant = now;
        let summary = simulation.tick(elapsed_ms)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, simulation);

        // --- Tick limit ---
        let limit_reached = control.tick_limit_reached(summary.tick);
        last_summary = Some(summary);
        if limit_reached {
            info!(max_ticks = control.max_ticks(), "Tick limit reached");
            break EndReason::MaxTicksReached;
        }

        // --- Cadence ---
        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    control.set_end_reason(end_reason).await;
    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
        started_at,
        ended_at: Utc::now(),
    })
}

/// Log how the run ended.
pub fn log_simulation_end(result: &SimulationResult) {
    let wall_ms = result
        .ended_at
        .signed_duration_since(result.started_at)
        .num_milliseconds();
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        wall_ms,
        "Simulation ended"
    );
    if let Some(summary) = &result.final_summary {
        info!(
            tick = summary.tick,
            now_ms = summary.now_ms,
            adults = summary.adults,
            juveniles = summary.juveniles,
            eggs = summary.eggs,
            feed_piles = summary.feed_piles,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roost_agents::Tunables;
    use roost_world::Viewport;

    use super::*;
    use crate::config::SimulationBoundsConfig;

    fn simulation() -> Simulation {
        let mut sim = Simulation::new(
            Viewport::new(640.0, 480.0).unwrap(),
            Tunables::default(),
            SmallRng::seed_from_u64(8),
        );
        sim.spawn_adults(4);
        sim
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut sim = simulation();
        let control = Arc::new(RunControl::new(0, &SimulationBoundsConfig { max_ticks: 5 }));
        let result = run_simulation(&mut sim, &control, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.unwrap().tick, 5);
        assert_eq!(control.end_reason().await, Some(EndReason::MaxTicksReached));
    }

    #[tokio::test]
    async fn stop_before_first_tick() {
        let mut sim = simulation();
        let control = Arc::new(RunControl::new(0, &SimulationBoundsConfig { max_ticks: 0 }));
        control.request_stop();
        let result = run_simulation(&mut sim, &control, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, EndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, _summary: &TickSummary, _simulation: &Simulation) {
                self.count = self.count.saturating_add(1);
            }
        }

        let mut sim = simulation();
        let control = Arc::new(RunControl::new(0, &SimulationBoundsConfig { max_ticks: 3 }));
        let mut callback = CountCallback { count: 0 };
        let _ = run_simulation(&mut sim, &control, &mut callback).await.unwrap();
        assert_eq!(callback.count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn virtual_time_follows_the_cadence() {
        let mut sim = simulation();
        let control = Arc::new(RunControl::new(
            100,
            &SimulationBoundsConfig { max_ticks: 4 },
        ));
        let result = run_simulation(&mut sim, &control, &mut NoOpCallback)
            .await
            .unwrap();

        // The first tick sees ~0 ms; each later one follows a 100 ms sleep.
        let now_ms = result.final_summary.unwrap().now_ms;
        assert!((299.0..=301.0).contains(&now_ms), "now_ms = {now_ms}");
    }

    #[tokio::test]
    async fn callback_can_stop_the_run() {
        struct StopAfter {
            control: Arc<RunControl>,
            remaining: u32,
        }
        impl TickCallback for StopAfter {
            fn on_tick(&mut self, _summary: &TickSummary, _simulation: &Simulation) {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.control.request_stop();
                }
            }
        }

        let mut sim = simulation();
        let control = Arc::new(RunControl::new(0, &SimulationBoundsConfig { max_ticks: 0 }));
        let mut callback = StopAfter {
            control: Arc::clone(&control),
            remaining: 2,
        };
        let result = run_simulation(&mut sim, &control, &mut callback).await.unwrap();
        assert_eq!(result.end_reason, EndReason::Stopped);
        assert_eq!(result.total_ticks, 2);
    }
}
