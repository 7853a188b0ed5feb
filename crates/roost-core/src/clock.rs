//! Simulation clock.
//!
//! The clock counts ticks and accumulates virtual time. It holds no
//! behavior: the tick pass reads it to decide which deferred tasks are due.
//!
//! Elapsed time comes from the host (usually the wall-clock gap between
//! two frames). Negative or non-finite gaps count as zero so a bad frame
//! time can never move the simulation backwards.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter plus accumulated virtual milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    tick: u64,
    elapsed_ms: f64,
}

impl SimulationClock {
    /// A clock at tick 0, time 0.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            elapsed_ms: 0.0,
        }
    }

    /// Advance by one tick covering `elapsed_ms`. Returns the new tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`. The clock is left unchanged in that case.
    pub fn advance(&mut self, elapsed_ms: f64) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.elapsed_ms += sanitize_elapsed(elapsed_ms);
        Ok(self.tick)
    }

    /// Ticks completed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Virtual milliseconds accumulated so far.
    pub const fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

/// Clamp a host-supplied frame gap to a usable value.
pub fn sanitize_elapsed(elapsed_ms: f64) -> f64 {
    if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
        elapsed_ms
    } else {
        0.0
    }
}
