// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live-update client: the public entry point.
//!
//! Provides a high-level interface for:
//! - Watching a set of resources through one push channel
//! - Falling back to fixed-interval polling while push is unhealthy
//! - Automatic reconnection with capped exponential backoff
//! - Deterministic disposal
//!
//! Each client runs one background task. The task and [`SyncClient::dispose`]
//! share the controller behind a mutex that is never held across an await or
//! while the change callback runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sp_core::backoff::{DEFAULT_BASE_MS, DEFAULT_CAP_MS};
use sp_core::{Backoff, WatchSet};

use super::callback::ChangeCallback;
use super::controller::{Controller, Timings};
use super::poller::DEFAULT_POLL_INTERVAL_MS;
use super::transport::{ChannelEvent, Transport, WebSocketTransport};
use crate::error::{Error, Result};

/// Configuration for live-update clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// URL of the relay server.
    #[serde(default = "default_url")]
    pub url: String,
    /// Interval between fallback polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Max time a new channel may take to confirm (milliseconds).
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,
    /// Wait before the very first connection attempt (milliseconds). 0 = none.
    #[serde(default)]
    pub settle_delay_ms: u64,
    /// Delay before the first reconnect (milliseconds).
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Upper bound on reconnect delays (milliseconds).
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
}

fn default_url() -> String {
    "ws://localhost:7890".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_confirm_timeout_ms() -> u64 {
    10_000
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BASE_MS
}

fn default_backoff_cap_ms() -> u64 {
    DEFAULT_CAP_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            url: default_url(),
            poll_interval_ms: default_poll_interval_ms(),
            confirm_timeout_ms: default_confirm_timeout_ms(),
            settle_delay_ms: 0,
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
        }
    }
}

impl SyncConfig {
    /// Checks the timer settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero poll interval, a zero
    /// confirmation timeout, a zero backoff base, or a cap below the base.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be positive".to_string()));
        }
        if self.confirm_timeout_ms == 0 {
            return Err(Error::Config(
                "confirm_timeout_ms must be positive".to_string(),
            ));
        }
        if self.backoff_base_ms == 0 {
            return Err(Error::Config("backoff_base_ms must be positive".to_string()));
        }
        if self.backoff_cap_ms < self.backoff_base_ms {
            return Err(Error::Config(format!(
                "backoff_cap_ms ({}) must be at least backoff_base_ms ({})",
                self.backoff_cap_ms, self.backoff_base_ms
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_cap_ms),
        )
    }

    fn timings(&self) -> Timings {
        Timings {
            confirm_timeout: self.confirm_timeout(),
            poll_interval: self.poll_interval(),
            backoff: self.backoff(),
        }
    }
}

type Shared<T> = Arc<Mutex<Controller<T>>>;

fn lock<T: Transport>(shared: &Shared<T>) -> MutexGuard<'_, Controller<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live-update client for one watch-set.
///
/// Dropping the client disposes it.
pub struct SyncClient<T: Transport = WebSocketTransport> {
    watch: WatchSet,
    controller: Shared<T>,
    callback: ChangeCallback,
    cancel: CancellationToken,
}

impl SyncClient<WebSocketTransport> {
    /// Starts a client that pushes through a WebSocket relay at `config.url`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect<F>(config: &SyncConfig, watch: WatchSet, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let transport = WebSocketTransport::new(config.url.clone());
        SyncClient::spawn(transport, config, watch, on_change)
    }
}

impl<T: Transport> SyncClient<T> {
    /// Starts a client over a custom transport.
    ///
    /// The connection attempt starts right away (or after the configured
    /// settle delay). `on_change` runs whenever a watched resource may have
    /// changed; it carries no payload, so the caller re-fetches.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(transport: T, config: &SyncConfig, watch: WatchSet, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (controller, events) = Controller::new(transport, watch.clone(), config.timings());
        let controller = Arc::new(Mutex::new(controller));
        let callback = ChangeCallback::new(on_change);
        let cancel = CancellationToken::new();

        tokio::spawn(drive(
            Arc::clone(&controller),
            events,
            callback.clone(),
            cancel.clone(),
            config.settle_delay(),
        ));

        SyncClient {
            watch,
            controller,
            callback,
            cancel,
        }
    }

    /// The resources this client watches.
    pub fn watch_set(&self) -> &WatchSet {
        &self.watch
    }

    /// Stops the client for good.
    ///
    /// Cancels every timer, tears down the channel and closes the callback
    /// gate. Once this returns the callback is not running and will not run
    /// again. Idempotent; safe to call from inside the callback.
    pub fn dispose(&self) {
        self.cancel.cancel();
        lock(&self.controller).dispose();
        self.callback.close();
    }

    #[cfg(test)]
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&Controller<T>) -> R) -> R {
        f(&lock(&self.controller))
    }
}

impl<T: Transport> Drop for SyncClient<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Background task: waits for the next deadline or channel event and
/// feeds it to the controller.
async fn drive<T: Transport>(
    controller: Shared<T>,
    mut events: mpsc::UnboundedReceiver<ChannelEvent>,
    callback: ChangeCallback,
    cancel: CancellationToken,
    settle_delay: Duration,
) {
    if !settle_delay.is_zero() {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(settle_delay) => {}
        }
    }

    lock(&controller).start(Instant::now());

    loop {
        let wakeups = {
            let controller = lock(&controller);
            if controller.is_disposed() {
                break;
            }
            controller.wakeups()
        };

        let notify = tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            Some(event) = events.recv() => {
                let mut controller = lock(&controller);
                controller.handle_event(event, Instant::now())
            }

            _ = sleep_until(wakeups.confirm) => {
                lock(&controller).on_confirm_deadline(Instant::now());
                false
            }

            _ = sleep_until(wakeups.reconnect) => {
                lock(&controller).on_reconnect_deadline(Instant::now());
                false
            }

            _ = sleep_until(wakeups.poll) => {
                let mut controller = lock(&controller);
                controller.on_poll_deadline(Instant::now())
            }
        };

        if notify {
            callback.invoke();
        }
    }

    debug!("live client task stopped");
}

/// Sleeps until `deadline`, or forever if there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
