//! Drift-corrected countdown for timed sessions.
//!
//! The host calls [`Countdown::start`] once and then [`Countdown::tick`] each
//! time the scheduled delay elapses, re-arming with the returned delay. The
//! deadline is virtual: it advances by exactly one interval per tick no
//! matter when the tick actually ran, so scheduling jitter does not
//! accumulate.

use serde::{Deserialize, Serialize};

use crate::PageConfig;

/// Nominal tick length in milliseconds.
pub const TICK_INTERVAL_MS: f64 = 1000.0;

/// Display units, each clamped at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeParts {
    pub fn from_remaining(remaining: i64) -> Self {
        let clamp = |units: i64| u32::try_from(units.max(0)).unwrap_or(u32::MAX);
        Self {
            hours: clamp(remaining / 3600),
            minutes: clamp((remaining % 3600) / 60),
            seconds: clamp(remaining % 60),
        }
    }

    /// `HH:MM:SS`.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// State after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub display: TimeParts,
    /// Value written into the hidden `duration` field.
    pub elapsed_secs: i64,
    /// Delay before the next tick, in milliseconds.
    pub next_delay_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    total_secs: u32,
    remaining: i64,
    interval_ms: f64,
    deadline_ms: Option<f64>,
}

impl Countdown {
    pub fn new(total_secs: u32) -> Self {
        Self::with_interval(total_secs, TICK_INTERVAL_MS)
    }

    pub fn with_interval(total_secs: u32, interval_ms: f64) -> Self {
        Self {
            total_secs,
            remaining: i64::from(total_secs),
            interval_ms,
            deadline_ms: None,
        }
    }

    /// Countdown for the page, or `None` when the session is untimed.
    pub fn from_config(config: &PageConfig) -> Option<Self> {
        config.timed.then(|| Self::new(config.time_limit_secs))
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    /// May go negative once the time limit has passed.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn display(&self) -> TimeParts {
        TimeParts::from_remaining(self.remaining)
    }

    pub fn elapsed_secs(&self) -> i64 {
        i64::from(self.total_secs) - self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0
    }

    /// Arms the first deadline and returns the initial delay.
    pub fn start(&mut self, now_ms: f64) -> f64 {
        self.deadline_ms = Some(now_ms + self.interval_ms);
        self.interval_ms
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        let deadline = self.deadline_ms.unwrap_or(now_ms);
        let drift = now_ms - deadline;
        self.remaining -= 1;
        self.deadline_ms = Some(deadline + self.interval_ms);
        Tick {
            display: self.display(),
            elapsed_secs: self.elapsed_secs(),
            next_delay_ms: (self.interval_ms - drift).max(0.0),
        }
    }
}
