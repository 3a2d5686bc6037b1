//! Recurring movement ticker.
//!
//! The ticker is a cooperative schedule, not a thread: the owning loop asks
//! `poll(now)` whether a tick is due and, when it is, posts the drift
//! through `FleetState::drift_all` like any other mutation. Timer code never
//! touches fleet state directly, so a tick and a user-triggered operation
//! can only interleave at whole-operation granularity.
//!
//! `cancel()` is final: once cancelled, `poll` never fires again. A missed
//! cancellation leaks polling work, not correctness.

use std::time::{Duration, Instant};

/// Per-axis half-width of the uniform drift applied each tick, in degrees.
pub const DRIFT_HALF_WIDTH: f64 = 0.005;

/// Fleet-wide drift period.
pub const TICK_PERIOD: Duration = Duration::from_millis(3000);

#[derive(Debug)]
pub struct MovementTicker {
    period: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl MovementTicker {
    /// A ticker on the standard period, with the first tick due one full
    /// period after `now`.
    pub fn new(now: Instant) -> Self {
        Self::with_period(TICK_PERIOD, now)
    }

    /// A ticker on a custom period. Tests use short periods.
    pub fn with_period(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
            cancelled: false,
        }
    }

    /// Report whether a tick is due at `now` and, if so, advance the
    /// deadline. Each call fires at most once; a long stall therefore
    /// coalesces missed periods into a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }

    /// Stop the ticker permanently.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
