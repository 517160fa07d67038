// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection and channel status values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported by a push channel after subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// The remote end acknowledged the subscription.
    Confirmed,
    /// The channel failed.
    Error,
    /// The channel gave up waiting on the remote end.
    TimedOut,
    /// The channel was closed.
    Closed,
}

impl ChannelStatus {
    /// Returns true for every status other than [`ChannelStatus::Confirmed`].
    pub fn is_failure(self) -> bool {
        !matches!(self, ChannelStatus::Confirmed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelStatus::Confirmed => "confirmed",
            ChannelStatus::Error => "error",
            ChannelStatus::TimedOut => "timed_out",
            ChannelStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a live client.
///
/// Valid transitions:
/// - Idle -> Connecting
/// - Connecting -> Healthy, Degraded
/// - Healthy -> Degraded
/// - Degraded -> Connecting
/// - any -> Disposed (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Created, no connection attempt yet.
    Idle,
    /// A channel exists and is waiting for confirmation.
    Connecting,
    /// The channel confirmed; changes arrive by push.
    Healthy,
    /// Push failed; polling while a reconnect is pending.
    Degraded,
    /// Terminal.
    Disposed,
}

impl ConnectionState {
    /// Returns true if the transition is allowed.
    pub fn can_transition_to(self, target: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Idle, Connecting)
                | (Connecting, Healthy)
                | (Connecting, Degraded)
                | (Healthy, Degraded)
                | (Degraded, Connecting)
                | (Idle, Disposed)
                | (Connecting, Disposed)
                | (Healthy, Disposed)
                | (Degraded, Disposed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Healthy => "healthy",
            ConnectionState::Degraded => "degraded",
            ConnectionState::Disposed => "disposed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
