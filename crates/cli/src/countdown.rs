//! Console countdown to the next report
//!
//! Driven by a one-second ticker in the binary. The countdown shows every
//! value from the full period down to one, then spends one tick resetting,
//! which is where the "No changes" hint is printed.

use std::time::Duration;

/// What the console should show for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds left until the next report
    Remaining(u64),
    /// The period ran out and the countdown was reset
    Elapsed { pending: bool },
}

/// Seconds-resolution countdown matching the report interval
#[derive(Debug, Clone)]
pub struct Countdown {
    period_secs: u64,
    remaining: u64,
}

impl Countdown {
    /// Build a countdown for the given report interval
    ///
    /// Sub-second intervals round up to one second.
    pub fn new(report_interval: Duration) -> Self {
        let period_secs = report_interval.as_millis().div_ceil(1000).max(1);
        let period_secs = u64::try_from(period_secs).unwrap_or(u64::MAX);
        Self {
            period_secs,
            remaining: period_secs,
        }
    }

    /// Advance by one second
    ///
    /// `pending` is only consulted on the reset tick.
    pub fn tick(&mut self, pending: bool) -> Tick {
        if self.remaining > 0 {
            let shown = self.remaining;
            self.remaining -= 1;
            Tick::Remaining(shown)
        } else {
            self.remaining = self.period_secs;
            Tick::Elapsed { pending }
        }
    }

    pub fn period_secs(&self) -> u64 {
        self.period_secs
    }
}

impl Tick {
    /// Console line for this tick, if any
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Remaining(secs) => Some(format!("Time until next report: {secs} seconds")),
            Self::Elapsed { pending: false } => Some("No changes".to_string()),
            Self::Elapsed { pending: true } => None,
        }
    }
}
