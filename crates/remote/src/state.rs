// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Relay state: the broadcast bus shared by every connection.

use std::sync::Arc;

use tokio::sync::broadcast;

/// Capacity of the change-signal bus. Slow connections that fall further
/// behind skip signals; receivers only need the latest anyway.
const BUS_CAPACITY: usize = 1024;

/// Shared relay state.
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayStateInner>,
}

struct RelayStateInner {
    /// Carries the name of each changed resource.
    changes: broadcast::Sender<String>,
}

impl RelayState {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(BUS_CAPACITY);
        RelayState {
            inner: Arc::new(RelayStateInner { changes }),
        }
    }

    /// Publishes a change signal. Returns the number of connections it
    /// reached (each filters by its own subscriptions).
    pub fn publish(&self, resource: impl Into<String>) -> usize {
        self.inner.changes.send(resource.into()).unwrap_or(0)
    }

    /// Receives every change signal published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inner.changes.subscribe()
    }

    /// Number of connections currently listening.
    pub fn connection_count(&self) -> usize {
        self.inner.changes.receiver_count()
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new()
    }
}
