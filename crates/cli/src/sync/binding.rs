// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Re-creation rule for views that own a live client.
//!
//! A view binds a watch-set plus a dependency key (any value whose change
//! should restart live updates, e.g. the selected branch). Binding the same
//! pair again is a no-op; binding a different pair disposes the old client
//! before the new one starts.

use sp_core::WatchSet;

use super::client::{SyncClient, SyncConfig};
use super::transport::Transport;

struct Bound<T: Transport, K> {
    key: K,
    client: SyncClient<T>,
}

/// Owns at most one live client and re-creates it when its inputs change.
pub struct LiveBinding<T: Transport + Clone, K: PartialEq> {
    transport: T,
    config: SyncConfig,
    bound: Option<Bound<T, K>>,
}

impl<T: Transport + Clone, K: PartialEq> LiveBinding<T, K> {
    pub fn new(transport: T, config: SyncConfig) -> Self {
        LiveBinding {
            transport,
            config,
            bound: None,
        }
    }

    /// Binds `watch` and `key`, returning true if a new client was started.
    ///
    /// When both equal the current binding the running client (and its
    /// original callback) is kept.
    pub fn bind<F>(&mut self, watch: WatchSet, key: K, on_change: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        if let Some(bound) = &self.bound {
            if bound.key == key && *bound.client.watch_set() == watch {
                return false;
            }
        }

        self.unbind();
        let client = SyncClient::spawn(self.transport.clone(), &self.config, watch, on_change);
        self.bound = Some(Bound { key, client });
        true
    }

    /// Disposes the current client, if any.
    pub fn unbind(&mut self) {
        if let Some(bound) = self.bound.take() {
            bound.client.dispose();
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// The currently bound watch-set.
    pub fn watch_set(&self) -> Option<&WatchSet> {
        self.bound.as_ref().map(|b| b.client.watch_set())
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
