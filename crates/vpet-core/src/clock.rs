//! Simulation clock.
//!
//! The clock counts frames and maps them to a simulated wall-clock time:
//! frame `n` happens `n / ticks_per_second` seconds after the configured
//! start. The frame counter is the source of truth; the time of day is
//! always derived from it, never stored.

use chrono::{Duration, NaiveDateTime};
use vpet_lifecycle::Cadence;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid tick rate.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Frame counter plus simulated wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    tick: u64,
    cadence: Cadence,
    start: NaiveDateTime,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_second` is 0.
    pub fn new(ticks_per_second: u32, start: NaiveDateTime) -> Result<Self, ClockError> {
        Self::from_parts(0, ticks_per_second, start)
    }

    /// Create a clock from explicit parameters (used when restoring state).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_second` is 0.
    pub fn from_parts(
        tick: u64,
        ticks_per_second: u32,
        start: NaiveDateTime,
    ) -> Result<Self, ClockError> {
        let cadence = Cadence::new(ticks_per_second).ok_or_else(|| ClockError::InvalidConfig {
            reason: "ticks_per_second must be at least 1".to_owned(),
        })?;
        Ok(Self {
            tick,
            cadence,
            start,
        })
    }

    /// Advance by one frame. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Frame-rate arithmetic for this clock.
    pub const fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Simulated time at which the clock started.
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Simulated wall-clock time of the current frame.
    pub fn now(&self) -> NaiveDateTime {
        let tps = u64::from(self.cadence.ticks_per_second());
        let seconds = self.tick.checked_div(tps).unwrap_or(0);
        let frames = self.tick.checked_rem(tps).unwrap_or(0);
        let millis = frames.saturating_mul(1000).checked_div(tps).unwrap_or(0);
        let offset = i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .zip(i64::try_from(millis).ok().and_then(Duration::try_milliseconds))
            .and_then(|(secs, ms)| secs.checked_add(&ms));
        offset
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(NaiveDateTime::MAX)
    }
}
