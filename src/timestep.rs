//! Frame-time accumulator driving fixed simulation steps.
//!
//! Render frames add wall-clock time; the simulation drains it in whole
//! ticks. Identical input sequences therefore produce identical state no
//! matter how the time was sliced into frames.
use log::warn;

use crate::error::ConfigError;
use crate::params::WorldParams;

/// Accumulates frame time and hands it out in whole ticks.
///
/// # Examples
/// ```
/// use tilebound::FixedTimestep;
/// let mut clock = FixedTimestep::new(0.25, 1.0).unwrap();
/// clock.accumulate(0.6);
/// assert_eq!(clock.drain(), 2);
/// assert!((clock.alpha() - 0.4).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    tick_seconds: f32,
    max_frame_seconds: f32,
    accumulator: f32,
    ticks: u64,
}

impl FixedTimestep {
    /// Creates an empty accumulator.
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositive`] when either duration is zero,
    /// negative or not finite.
    pub fn new(tick_seconds: f32, max_frame_seconds: f32) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("tick_seconds", tick_seconds),
            ("max_frame_seconds", max_frame_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(Self {
            tick_seconds,
            max_frame_seconds,
            accumulator: 0.0,
            ticks: 0,
        })
    }

    /// Creates an accumulator from world tuning.
    ///
    /// # Errors
    /// See [`FixedTimestep::new`].
    pub fn from_params(params: &WorldParams) -> Result<Self, ConfigError> {
        Self::new(params.tick_seconds, params.max_frame_seconds)
    }

    /// Adds one frame's elapsed time.
    ///
    /// Frames longer than the configured cap are truncated so a stalled
    /// process cannot queue an unbounded backlog of ticks.
    pub fn accumulate(&mut self, frame_seconds: f32) {
        if !frame_seconds.is_finite() || frame_seconds < 0.0 {
            warn!("ignoring invalid frame time {frame_seconds}");
            return;
        }
        self.accumulator += frame_seconds.min(self.max_frame_seconds);
    }

    /// Consumes one tick if enough time has accumulated.
    pub fn try_tick(&mut self) -> bool {
        if self.accumulator < self.tick_seconds {
            return false;
        }
        self.accumulator -= self.tick_seconds;
        self.ticks += 1;
        true
    }

    /// Consumes every whole tick, returning how many were taken.
    pub fn drain(&mut self) -> u32 {
        let mut drained = 0;
        while self.try_tick() {
            drained += 1;
        }
        drained
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.tick_seconds).clamp(0.0, 1.0)
    }

    /// Length of one tick in seconds.
    #[must_use]
    pub const fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    /// Total ticks handed out so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> FixedTimestep {
        FixedTimestep::new(0.125, 0.5).expect("valid durations")
    }

    #[rstest]
    fn slicing_does_not_change_tick_count(mut clock: FixedTimestep) {
        let mut sliced = clock.clone();
        clock.accumulate(0.5);
        let whole = clock.drain();
        let mut parts = 0;
        for _ in 0..4 {
            sliced.accumulate(0.125);
            parts += sliced.drain();
        }
        assert_eq!(whole, 4);
        assert_eq!(parts, whole);
    }

    #[rstest]
    fn long_frames_are_capped(mut clock: FixedTimestep) {
        clock.accumulate(10.0);
        assert_eq!(clock.drain(), 4);
        assert_eq!(clock.ticks(), 4);
    }

    #[rstest]
    fn remainder_feeds_alpha(mut clock: FixedTimestep) {
        clock.accumulate(0.1875);
        assert_eq!(clock.drain(), 1);
        assert_relative_eq!(clock.alpha(), 0.5);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f32::NAN)]
    fn invalid_frames_are_ignored(mut clock: FixedTimestep, #[case] frame: f32) {
        clock.accumulate(frame);
        assert!(!clock.try_tick());
        assert_relative_eq!(clock.alpha(), 0.0);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.1, -1.0)]
    fn rejects_non_positive_durations(#[case] tick: f32, #[case] cap: f32) {
        assert!(FixedTimestep::new(tick, cap).is_err());
    }
}
