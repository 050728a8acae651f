//! Game clock.
//!
//! Time is measured in minutes remaining in the current period. The clock
//! only runs down; each new period or overtime resets it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Result of advancing the clock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockTick {
    /// Minutes left after the advance (never negative).
    pub remaining: f64,
    /// Minutes actually consumed (excess past the buzzer is discarded).
    pub elapsed: f64,
    pub period_ended: bool,
}

/// Tracks the period number and time left in it.
#[derive(Clone, Debug, Default)]
pub struct ClockScheduler {
    period: u8,
    overtime: bool,
    length: f64,
    remaining: f64,
}

impl ClockScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the next regulation period.
    pub fn start_period(&mut self, length: f64) -> Result<()> {
        self.start(length, false)
    }

    /// Start the next period as an overtime.
    pub fn start_overtime(&mut self, length: f64) -> Result<()> {
        self.start(length, true)
    }

    fn start(&mut self, length: f64, overtime: bool) -> Result<()> {
        if !length.is_finite() || length <= 0.0 {
            return Err(SimError::Invariant(format!("period length {length} is not positive")));
        }
        self.period = self.period.checked_add(1).ok_or_else(|| {
            SimError::Invariant("period counter overflowed".into())
        })?;
        self.overtime = overtime;
        self.length = length;
        self.remaining = length;
        Ok(())
    }

    /// Run the clock down by `dt` minutes.
    ///
    /// ```
    /// use courtsim::sim::ClockScheduler;
    ///
    /// let mut clock = ClockScheduler::new();
    /// clock.start_period(1.0).unwrap();
    ///
    /// let tick = clock.advance(0.75).unwrap();
    /// assert!(!tick.period_ended);
    ///
    /// let tick = clock.advance(0.5).unwrap();
    /// assert!(tick.period_ended);
    /// assert_eq!(tick.remaining, 0.0);
    /// assert!((tick.elapsed - 0.25).abs() < 1e-12);
    /// ```
    pub fn advance(&mut self, dt: f64) -> Result<ClockTick> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::Invariant(format!("clock cannot advance by {dt}")));
        }

        let elapsed = dt.min(self.remaining);
        self.remaining = (self.remaining - elapsed).max(0.0);
        Ok(ClockTick {
            remaining: self.remaining,
            elapsed,
            period_ended: self.remaining <= 0.0,
        })
    }

    /// Minutes left in the current period.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Minutes played in the current period.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.length - self.remaining
    }

    /// Current period, 1-based (0 before the game starts).
    #[must_use]
    pub fn period(&self) -> u8 {
        self.period
    }

    #[must_use]
    pub fn is_overtime(&self) -> bool {
        self.overtime
    }
}
