//! Fixed-cadence tick schedule
//!
//! Ticks are due every `interval`. A caller that falls behind gets exactly one
//! tick for the current poll; the deadlines it slept through are reported as
//! missed and dropped, never replayed.

use std::time::{Duration, Instant};

/// Shortest interval the schedule accepts; shorter requests are raised to it
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// A tick that is due now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDue {
    /// Deadlines that passed without a tick since the previous poll
    pub missed: u64,
}

/// Deadline tracker for a fixed-interval tick driver
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Instant,
}

impl TickSchedule {
    /// First tick falls one interval after `start`
    #[must_use]
    pub fn new(interval: Duration, start: Instant) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        Self {
            interval,
            next_due: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Time left before the next tick (zero if already due)
    pub fn time_until(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Check whether a tick is due at `now`
    ///
    /// When due, the next deadline is realigned to the cadence grid so a late
    /// caller does not drift.
    pub fn poll(&mut self, now: Instant) -> Option<TickDue> {
        if now < self.next_due {
            return None;
        }

        let late = now - self.next_due;
        let interval_ns = self.interval.as_nanos();
        let missed = u64::try_from(late.as_nanos() / interval_ns).unwrap_or(u64::MAX);
        let phase = Duration::from_nanos((late.as_nanos() % interval_ns) as u64);

        self.next_due = now + (self.interval - phase);
        Some(TickDue { missed })
    }
}
