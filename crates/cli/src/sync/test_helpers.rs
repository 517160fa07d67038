// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sp_core::{ChannelStatus, WatchSet};

use super::client::SyncConfig;
use super::transport::{
    ChangeSink, Channel, StatusSink, Transport, TransportError, TransportResult,
};

/// Recorded state of one mock channel.
#[derive(Default)]
pub struct MockChannelState {
    pub name: String,
    sinks: Mutex<Vec<ChangeSink>>,
    status: Mutex<Option<StatusSink>>,
    teardowns: AtomicUsize,
}

impl MockChannelState {
    /// Resources registered on this channel, in registration order.
    pub fn resources(&self) -> Vec<String> {
        self.sinks
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.resource().to_string())
            .collect()
    }

    pub fn is_subscribed(&self) -> bool {
        self.status.lock().unwrap().is_some()
    }

    pub fn teardown_count(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown_count() > 0
    }

    /// Reports a status as the remote end would.
    pub fn report(&self, status: ChannelStatus) {
        let sink = self.status.lock().unwrap().clone();
        sink.expect("channel not subscribed").report(status);
    }

    pub fn confirm(&self) {
        self.report(ChannelStatus::Confirmed);
    }

    /// Delivers a change signal for `resource`.
    pub fn change(&self, resource: &str) {
        let sinks = self.sinks.lock().unwrap().clone();
        let sink = sinks
            .into_iter()
            .find(|s| s.resource() == resource)
            .expect("resource not registered");
        sink.notify();
    }
}

/// Mock channel handed out by [`MockTransport`].
pub struct MockChannel {
    state: Arc<MockChannelState>,
    fail_subscribe: bool,
}

impl Channel for MockChannel {
    fn register_resource(&mut self, _resource: &str, sink: ChangeSink) -> TransportResult<()> {
        self.state.sinks.lock().unwrap().push(sink);
        Ok(())
    }

    fn subscribe(&mut self, sink: StatusSink) -> TransportResult<()> {
        if self.fail_subscribe {
            return Err(TransportError::SubscribeFailed("mock failure".into()));
        }
        *self.state.status.lock().unwrap() = Some(sink);
        Ok(())
    }

    fn teardown(&mut self) {
        self.state.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct MockTransportState {
    channels: Vec<Arc<MockChannelState>>,
    create_attempts: usize,
    fail_creates: usize,
    fail_subscribes: usize,
}

/// Scripted transport for testing without sockets.
///
/// Clones share state, so a test keeps one clone and hands the other to the
/// client.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` `create_channel` calls fail.
    pub fn fail_creates(&self, n: usize) {
        self.inner.lock().unwrap().fail_creates = n;
    }

    /// Makes the next `n` subscriptions fail.
    pub fn fail_subscribes(&self, n: usize) {
        self.inner.lock().unwrap().fail_subscribes = n;
    }

    /// Number of `create_channel` calls, including failed ones.
    pub fn create_attempts(&self) -> usize {
        self.inner.lock().unwrap().create_attempts
    }

    /// Number of channels successfully created.
    pub fn channel_count(&self) -> usize {
        self.inner.lock().unwrap().channels.len()
    }

    pub fn channel(&self, index: usize) -> Arc<MockChannelState> {
        Arc::clone(&self.inner.lock().unwrap().channels[index])
    }

    pub fn last(&self) -> Arc<MockChannelState> {
        let inner = self.inner.lock().unwrap();
        Arc::clone(inner.channels.last().expect("no channel created"))
    }

    /// Channels created and not yet torn down.
    pub fn live_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .channels
            .iter()
            .filter(|c| !c.is_torn_down())
            .count()
    }
}

impl Transport for MockTransport {
    type Channel = MockChannel;

    fn create_channel(&self, name: &str) -> TransportResult<MockChannel> {
        let mut inner = self.inner.lock().unwrap();
        inner.create_attempts += 1;
        if inner.fail_creates > 0 {
            inner.fail_creates -= 1;
            return Err(TransportError::ConnectionFailed("mock failure".into()));
        }

        let fail_subscribe = inner.fail_subscribes > 0;
        if fail_subscribe {
            inner.fail_subscribes -= 1;
        }

        let state = Arc::new(MockChannelState {
            name: name.to_string(),
            ..Default::default()
        });
        inner.channels.push(Arc::clone(&state));
        Ok(MockChannel {
            state,
            fail_subscribe,
        })
    }
}

/// Watch-set used across the sync tests.
pub fn watch() -> WatchSet {
    WatchSet::new(["products", "sales"]).unwrap()
}

/// Default timings: 30s poll, 10s confirmation, 5s..300s backoff.
pub fn test_config() -> SyncConfig {
    SyncConfig::default()
}

/// A change callback that counts its invocations.
pub fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    (calls, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}
