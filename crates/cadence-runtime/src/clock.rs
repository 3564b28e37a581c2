//! Fixed-timestep tick accumulator

use std::time::{Duration, Instant};

/// Converts elapsed wall-clock time into whole simulation ticks
///
/// The accumulator is measured in ticks rather than seconds: advancing by
/// `elapsed` adds `elapsed / fixed_step` and drains the whole part. After
/// every drain the fractional carry is in `[0, 1)`. There is no catch-up
/// clamp — a slow frame produces a burst of ticks, never a slowed simulation.
pub struct TickClock {
    /// Fixed simulation step in seconds
    fixed_step: f64,
    /// Fractional ticks carried over from the last advance
    accumulator: f64,
    /// Anchor for the next elapsed-time measurement
    last_instant: Instant,
}

impl TickClock {
    /// Create a clock for the given fixed step. The step must already be
    /// validated (positive, finite) by the configuration layer.
    pub fn new(fixed_step: f64) -> Self {
        Self {
            fixed_step,
            accumulator: 0.0,
            last_instant: Instant::now(),
        }
    }

    /// Measure elapsed wall time since the last call and return the number
    /// of whole ticks owed
    pub fn advance(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.advance_by(elapsed)
    }

    /// Advance by an explicit elapsed duration and return the number of
    /// whole ticks owed
    pub fn advance_by(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.as_secs_f64() / self.fixed_step;
        let owed = self.accumulator.floor();
        self.accumulator -= owed;
        owed as u32
    }

    /// Drop any accrued time debt and re-anchor the measurement
    ///
    /// Called while the loop is paused, so resuming does not replay the
    /// pause as a burst of catch-up ticks.
    pub fn discard_debt(&mut self) {
        self.accumulator = 0.0;
        self.last_instant = Instant::now();
    }

    /// The fixed simulation step in seconds
    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// The fractional ticks currently carried over, in `[0, 1)` after any
    /// `advance` call
    pub fn accumulated_ticks(&self) -> f64 {
        self.accumulator
    }
}
