// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fallback poller: keeps data fresh while push delivery is unconfirmed.
//!
//! The poller only tracks *when* the next poll is due. The client task
//! sleeps until that deadline and then invokes the change callback, so a
//! stopped poller has no timer left to fire.

use std::time::Duration;

use tokio::time::Instant;

/// Default interval between fallback polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Fixed-interval poll schedule.
#[derive(Debug, Clone)]
pub(crate) struct FallbackPoller {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FallbackPoller {
    pub(crate) fn new(interval: Duration) -> Self {
        FallbackPoller {
            interval,
            next_due: None,
        }
    }

    /// Starts polling; the first poll is due one interval from `now`.
    ///
    /// Returns false if the poller was already running (the schedule is kept).
    pub(crate) fn start(&mut self, now: Instant) -> bool {
        if self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }

    /// Stops polling. Returns false if the poller was not running.
    pub(crate) fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Deadline of the next poll, if running.
    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consumes a due poll and schedules the next one.
    ///
    /// Returns true if a poll was due at `now`; the caller then invokes the
    /// callback.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
