// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle controller.
//!
//! A synchronous state machine: every method takes the current instant and
//! mutates the owned state, channel, retry counter and timer deadlines. The
//! client task (see `client.rs`) sleeps until the earliest deadline or the
//! next channel event and feeds the result back in.
//!
//! ```text
//!            start            Confirmed
//!   Idle ───────────► Connecting ───────► Healthy
//!                       │  ▲                 │
//!   timeout / failure   │  │ reconnect due   │ Error / Closed / TimedOut
//!                       ▼  │                 │
//!                     Degraded ◄─────────────┘
//! ```
//!
//! Any state moves to `Disposed` on `dispose`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use sp_core::{Backoff, ChannelStatus, ConnectionState, RetryState, WatchSet};

use super::poller::FallbackPoller;
use super::transport::{
    Channel, ChangeSink, ChannelEvent, HandleId, StatusSink, Transport, TransportError,
    TransportResult,
};

/// Why a connection attempt was abandoned.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Failure {
    #[error("channel construction failed: {0}")]
    Construction(#[from] TransportError),

    #[error("no confirmation within {0:?}")]
    ConfirmationTimeout(Duration),

    #[error("channel reported {0}")]
    Transport(ChannelStatus),
}

/// Timer settings for one controller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timings {
    pub confirm_timeout: Duration,
    pub poll_interval: Duration,
    pub backoff: Backoff,
}

/// The channel owned by the current attempt.
struct LiveChannel<C> {
    id: HandleId,
    channel: C,
}

/// Deadlines the client task must wake up for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Wakeups {
    pub confirm: Option<Instant>,
    pub reconnect: Option<Instant>,
    pub poll: Option<Instant>,
}

pub(crate) struct Controller<T: Transport> {
    transport: T,
    watch: WatchSet,
    timings: Timings,
    state: ConnectionState,
    retry: RetryState,
    live: Option<LiveChannel<T::Channel>>,
    last_id: HandleId,
    poller: FallbackPoller,
    confirm_deadline: Option<Instant>,
    reconnect_deadline: Option<Instant>,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl<T: Transport> Controller<T> {
    /// Creates an idle controller and the receiver its channels report to.
    pub(crate) fn new(
        transport: T,
        watch: WatchSet,
        timings: Timings,
    ) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let controller = Controller {
            transport,
            watch,
            retry: RetryState::new(&timings.backoff),
            poller: FallbackPoller::new(timings.poll_interval),
            timings,
            state: ConnectionState::Idle,
            live: None,
            last_id: 0,
            confirm_deadline: None,
            reconnect_deadline: None,
            events,
        };
        (controller, events_rx)
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn retry(&self) -> RetryState {
        self.retry
    }

    #[cfg(test)]
    pub(crate) fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Id of the live channel, if any.
    pub(crate) fn live_handle(&self) -> Option<HandleId> {
        self.live.as_ref().map(|l| l.id)
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.state == ConnectionState::Disposed
    }

    pub(crate) fn wakeups(&self) -> Wakeups {
        Wakeups {
            confirm: self.confirm_deadline,
            reconnect: self.reconnect_deadline,
            poll: self.poller.next_due(),
        }
    }

    /// Idle -> Connecting. No-op in any other state.
    pub(crate) fn start(&mut self, now: Instant) {
        if self.state == ConnectionState::Idle {
            self.connect(now);
        }
    }

    /// Applies a channel event. Returns true if the change callback should run.
    pub(crate) fn handle_event(&mut self, event: ChannelEvent, now: Instant) -> bool {
        if self.live_handle() != Some(event.handle()) {
            debug!("ignoring event from superseded channel {}", event.handle());
            return false;
        }

        match event {
            ChannelEvent::Changed { resource, .. } => {
                debug!("push change for {}", resource);
                true
            }
            ChannelEvent::Status { status, .. } if status.is_failure() => {
                self.fail(Failure::Transport(status), now);
                false
            }
            ChannelEvent::Status { .. } => {
                if self.state == ConnectionState::Connecting {
                    self.confirm();
                }
                false
            }
        }
    }

    /// Fails the attempt if it is still unconfirmed at its deadline.
    pub(crate) fn on_confirm_deadline(&mut self, now: Instant) {
        let due = self.confirm_deadline.is_some_and(|d| d <= now);
        if due && self.state == ConnectionState::Connecting {
            self.fail(Failure::ConfirmationTimeout(self.timings.confirm_timeout), now);
        }
    }

    /// Degraded -> Connecting once the reconnect delay has elapsed.
    pub(crate) fn on_reconnect_deadline(&mut self, now: Instant) {
        let due = self.reconnect_deadline.is_some_and(|d| d <= now);
        if due && self.state == ConnectionState::Degraded {
            self.reconnect_deadline = None;
            self.connect(now);
        }
    }

    /// Returns true if a fallback poll was due; the caller runs the callback.
    pub(crate) fn on_poll_deadline(&mut self, now: Instant) -> bool {
        !self.is_disposed() && self.poller.fire(now)
    }

    /// Moves to Disposed: clears every timer and tears down the channel.
    pub(crate) fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.confirm_deadline = None;
        self.reconnect_deadline = None;
        self.poller.stop();
        self.teardown_live();
        self.transition(ConnectionState::Disposed);
    }

    fn connect(&mut self, now: Instant) {
        self.teardown_live();
        self.last_id += 1;
        let id = self.last_id;
        self.transition(ConnectionState::Connecting);

        match self.open_channel(id) {
            Ok(channel) => {
                debug!("channel {} subscribed for {}", id, self.watch);
                self.live = Some(LiveChannel { id, channel });
                self.confirm_deadline = Some(now + self.timings.confirm_timeout);
            }
            Err(e) => self.fail(e.into(), now),
        }
    }

    fn open_channel(&self, id: HandleId) -> TransportResult<T::Channel> {
        let mut channel = self
            .transport
            .create_channel(&self.watch.channel_name())?;

        let registered = self.watch.iter().try_for_each(|resource| {
            channel.register_resource(resource, ChangeSink::new(id, resource, self.events.clone()))
        });
        let subscribed =
            registered.and_then(|()| channel.subscribe(StatusSink::new(id, self.events.clone())));

        if let Err(e) = subscribed {
            channel.teardown();
            return Err(e);
        }
        Ok(channel)
    }

    fn confirm(&mut self) {
        self.confirm_deadline = None;
        if self.poller.stop() {
            debug!("fallback polling stopped for {}", self.watch);
        }
        self.retry.reset(&self.timings.backoff);
        self.transition(ConnectionState::Healthy);
    }

    fn fail(&mut self, failure: Failure, now: Instant) {
        self.teardown_live();
        self.confirm_deadline = None;
        self.transition(ConnectionState::Degraded);
        if self.poller.start(now) {
            debug!("fallback polling started for {}", self.watch);
        }

        let delay = self.retry.record_failure(&self.timings.backoff);
        self.reconnect_deadline = Some(now + delay);

        match failure {
            Failure::Transport(_) | Failure::ConfirmationTimeout(_) => {
                debug!(
                    "live updates for {} degraded: {}; attempt {}, reconnecting in {:?}",
                    self.watch, failure, self.retry.attempt, delay
                );
            }
            Failure::Construction(_) => {
                warn!(
                    "live updates for {} unavailable: {}; attempt {}, reconnecting in {:?}",
                    self.watch, failure, self.retry.attempt, delay
                );
            }
        }
    }

    fn teardown_live(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.channel.teardown();
        }
    }

    fn transition(&mut self, to: ConnectionState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "invalid transition {} -> {}",
            self.state,
            to
        );
        debug!("{}: {} -> {}", self.watch, self.state, to);
        self.state = to;
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
