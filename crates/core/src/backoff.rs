// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capped exponential backoff for reconnect scheduling.
//!
//! `delay(attempt) = min(base * 2^attempt, cap)`
//!
//! With the defaults the schedule is 5s, 10s, 20s, 40s, ... up to 5 minutes.

use std::time::Duration;

/// Default delay before the first reconnect (milliseconds).
pub const DEFAULT_BASE_MS: u64 = 5_000;
/// Default upper bound on any reconnect delay (milliseconds).
pub const DEFAULT_CAP_MS: u64 = 300_000;

/// Capped exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
}

impl Backoff {
    /// Creates a policy with the given base delay and cap.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Backoff { base, cap }
    }

    /// Delay before the first reconnect.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Upper bound on any delay.
    pub fn cap(&self) -> Duration {
        self.cap
    }

    /// Returns the delay to wait after the failure numbered `attempt` (0-based).
    ///
    /// Saturates instead of overflowing, so any attempt count is valid.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base_ms = millis(self.base);
        let cap_ms = millis(self.cap);
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(factor).min(cap_ms))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new(
            Duration::from_millis(DEFAULT_BASE_MS),
            Duration::from_millis(DEFAULT_CAP_MS),
        )
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Retry bookkeeping for one live client.
///
/// `attempt` counts consecutive failed connection attempts since the last
/// healthy connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Consecutive failures since the last healthy connection.
    pub attempt: u32,
    /// Delay that the next failure will schedule.
    pub next_delay: Duration,
}

impl RetryState {
    /// Creates a fresh retry state for the given policy.
    pub fn new(backoff: &Backoff) -> Self {
        RetryState {
            attempt: 0,
            next_delay: backoff.delay(0),
        }
    }

    /// Records a failed attempt and returns the reconnect delay to schedule.
    pub fn record_failure(&mut self, backoff: &Backoff) -> Duration {
        let delay = backoff.delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        self.next_delay = backoff.delay(self.attempt);
        delay
    }

    /// Resets after a healthy connection.
    pub fn reset(&mut self, backoff: &Backoff) {
        *self = RetryState::new(backoff);
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
