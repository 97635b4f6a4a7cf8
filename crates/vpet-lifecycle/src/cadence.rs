//! Frame-rate dependent cadence arithmetic.
//!
//! Everything in the simulation is counted in frames. [`Cadence`] converts
//! seconds, minutes, hours and days into frame counts for a given simulation
//! rate, and answers the "does this counter sit on a boundary" questions that
//! gate once-per-minute and once-per-day work. All conversions saturate.

/// Default simulation rate in frames per second.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 30;

/// Age after which adult-only rules (faster pooping, stage-6 death rule,
/// traited eggs) apply, in hours.
pub const MATURITY_HOURS: u64 = 48;

/// Reference frame rate that scripted animation frames are authored at.
const AUTHORED_FRAME_RATE: u32 = 30;

/// Frame-count conversions for a fixed simulation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cadence {
    ticks_per_second: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
        }
    }
}

impl Cadence {
    /// Create a cadence for `ticks_per_second` frames per second.
    ///
    /// Returns `None` for a zero rate.
    pub const fn new(ticks_per_second: u32) -> Option<Self> {
        if ticks_per_second == 0 {
            None
        } else {
            Some(Self { ticks_per_second })
        }
    }

    /// Frames per second.
    pub const fn ticks_per_second(self) -> u32 {
        self.ticks_per_second
    }

    /// Frames per second, widened.
    pub fn second(self) -> u64 {
        u64::from(self.ticks_per_second)
    }

    /// Frames per minute.
    pub fn minute(self) -> u64 {
        self.second().saturating_mul(60)
    }

    /// Frames in `minutes` minutes.
    pub fn minutes(self, minutes: u32) -> u64 {
        self.minute().saturating_mul(u64::from(minutes))
    }

    /// Frames in `hours` hours.
    pub fn hours(self, hours: u64) -> u64 {
        self.minute().saturating_mul(60).saturating_mul(hours)
    }

    /// Frames per day.
    pub fn day(self) -> u64 {
        self.hours(24)
    }

    /// Whole minutes contained in `frames`.
    pub fn whole_minutes(self, frames: u64) -> u64 {
        frames.checked_div(self.minute()).unwrap_or(0)
    }

    /// Whole hours contained in `frames`.
    pub fn whole_hours(self, frames: u64) -> u64 {
        frames.checked_div(self.hours(1)).unwrap_or(0)
    }

    /// `ticks_per_second / divisor`, never below one frame.
    pub fn fraction(self, divisor: u32) -> u32 {
        self.ticks_per_second
            .checked_div(divisor)
            .unwrap_or(0)
            .max(1)
    }

    /// Rescale a frame number authored for 30 fps to this rate.
    pub fn scaled(self, authored_frame: u32) -> u32 {
        authored_frame
            .saturating_mul(self.ticks_per_second)
            .checked_div(AUTHORED_FRAME_RATE)
            .unwrap_or(0)
    }

    /// Whether an age (in frames) has reached [`MATURITY_HOURS`].
    pub fn is_mature(self, age_frames: u64) -> bool {
        age_frames >= self.hours(MATURITY_HOURS)
    }

    /// Whether `counter` sits on a minute boundary.
    pub fn on_minute(self, counter: u64) -> bool {
        is_multiple(counter, self.minute())
    }

    /// Whether `counter` sits on a day boundary.
    pub fn on_day(self, counter: u64) -> bool {
        is_multiple(counter, self.day())
    }
}

/// Whether `counter` is a non-zero multiple of `period`.
///
/// A zero period never matches, so a zero interval disables the gated work.
pub fn is_multiple(counter: u64, period: u64) -> bool {
    counter != 0 && counter.checked_rem(period) == Some(0)
}
