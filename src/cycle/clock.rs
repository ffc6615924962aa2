//! Time sources for phase countdowns.
//!
//! The runner never sleeps on its own; it asks a [`PhaseClock`] to let signal
//! time pass, so the same state machine runs against wall-clock time in the
//! binary and against an instant clock in tests.

use crate::config::MAX_TIME_SCALE;
use std::time::Duration;

pub trait PhaseClock {
    /// Block until `duration` of signal time has elapsed.
    fn sleep(&mut self, duration: Duration);
}

impl PhaseClock for Box<dyn PhaseClock + Send> {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Sleeps the current thread, scaled by `time_scale` real seconds per signal second.
#[derive(Debug, Clone)]
pub struct ThreadClock {
    time_scale: f64,
}

impl ThreadClock {
    /// Negative or NaN scales fall back to real time; larger ones are capped at [`MAX_TIME_SCALE`].
    pub fn new(time_scale: f64) -> Self {
        let time_scale = if time_scale.is_nan() || time_scale < 0.0 {
            1.0
        } else {
            time_scale.min(MAX_TIME_SCALE)
        };
        Self { time_scale }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl PhaseClock for ThreadClock {
    fn sleep(&mut self, duration: Duration) {
        // Saturates on overflow.
        let scaled = Duration::try_from_secs_f64(duration.as_secs_f64() * self.time_scale)
            .unwrap_or(Duration::MAX);
        if !scaled.is_zero() {
            std::thread::sleep(scaled);
        }
    }
}

/// Advances instantly and keeps track of how much signal time has passed.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl PhaseClock for SimulatedClock {
    fn sleep(&mut self, duration: Duration) {
        self.elapsed += duration;
        self.sleeps.push(duration);
    }
}
