// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for push channels.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket channels for production
//! - Scripted transports for unit testing
//!
//! A [`Transport`] creates one [`Channel`] per connection attempt. The
//! controller registers every watched resource on the channel, then
//! subscribes. Channels never call back into the controller directly: they
//! push tagged events through [`ChangeSink`] and [`StatusSink`], and the
//! controller drops events from channels it no longer owns.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sp_core::protocol::{ClientMessage, ServerMessage};
use sp_core::ChannelStatus;

/// Identifies one channel within one client. Assigned in increasing order.
pub type HandleId = u64;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel could not be created.
    #[error("invalid channel url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Channel creation needs a Tokio runtime and none is running.
    #[error("no tokio runtime available for channel")]
    NoRuntime,

    /// Registration or subscription was rejected.
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Event delivered from a channel to its owning controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChannelEvent {
    Changed { handle: HandleId, resource: String },
    Status { handle: HandleId, status: ChannelStatus },
}

impl ChannelEvent {
    pub(crate) fn handle(&self) -> HandleId {
        match self {
            ChannelEvent::Changed { handle, .. } | ChannelEvent::Status { handle, .. } => *handle,
        }
    }
}

/// Receives change signals for one watched resource.
///
/// Cheap to clone; sending never blocks and is silently dropped once the
/// owning client is gone.
#[derive(Debug, Clone)]
pub struct ChangeSink {
    handle: HandleId,
    resource: Arc<str>,
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl ChangeSink {
    pub(crate) fn new(
        handle: HandleId,
        resource: &str,
        tx: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Self {
        ChangeSink {
            handle,
            resource: Arc::from(resource),
            tx,
        }
    }

    /// The resource this sink was registered for.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Signals that the resource changed.
    pub fn notify(&self) {
        let _ = self.tx.send(ChannelEvent::Changed {
            handle: self.handle,
            resource: self.resource.to_string(),
        });
    }
}

/// Receives channel status reports.
#[derive(Debug, Clone)]
pub struct StatusSink {
    handle: HandleId,
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl StatusSink {
    pub(crate) fn new(handle: HandleId, tx: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        StatusSink { handle, tx }
    }

    /// Reports a status change.
    pub fn report(&self, status: ChannelStatus) {
        let _ = self.tx.send(ChannelEvent::Status {
            handle: self.handle,
            status,
        });
    }
}

/// One push subscription covering every resource of a watch-set.
pub trait Channel: Send + 'static {
    /// Registers a resource. Called once per watched resource before
    /// [`Channel::subscribe`].
    fn register_resource(&mut self, resource: &str, sink: ChangeSink) -> TransportResult<()>;

    /// Starts the subscription. Status changes are reported through `sink`.
    fn subscribe(&mut self, sink: StatusSink) -> TransportResult<()>;

    /// Tears the channel down. Idempotent and best-effort.
    fn teardown(&mut self);
}

/// Factory for push channels.
pub trait Transport: Send + Sync + 'static {
    type Channel: Channel;

    /// Creates a channel. Errors here are construction failures.
    fn create_channel(&self, name: &str) -> TransportResult<Self::Channel>;
}

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport for the given relay URL.
    pub fn new(url: impl Into<String>) -> Self {
        WebSocketTransport { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks that `url` is a well-formed `ws://` or `wss://` relay URL.
    pub fn validate_url(url: &str) -> TransportResult<()> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: "must start with ws:// or wss://".to_string(),
            });
        }
        url.into_client_request()
            .map_err(|e| TransportError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl Transport for WebSocketTransport {
    type Channel = WebSocketChannel;

    fn create_channel(&self, name: &str) -> TransportResult<WebSocketChannel> {
        Self::validate_url(&self.url)?;

        Ok(WebSocketChannel {
            name: name.to_string(),
            url: self.url.clone(),
            resources: Vec::new(),
            sinks: HashMap::new(),
            cancel: CancellationToken::new(),
            subscribed: false,
        })
    }
}

/// A single WebSocket subscription.
///
/// The socket lives in a background task started by `subscribe`; teardown
/// cancels that task, which closes the socket.
pub struct WebSocketChannel {
    name: String,
    url: String,
    /// Registered resource names, in registration order.
    resources: Vec<String>,
    sinks: HashMap<String, ChangeSink>,
    cancel: CancellationToken,
    subscribed: bool,
}

impl Channel for WebSocketChannel {
    fn register_resource(&mut self, resource: &str, sink: ChangeSink) -> TransportResult<()> {
        if self.subscribed {
            return Err(TransportError::SubscribeFailed(format!(
                "cannot register '{}' after subscribing",
                resource
            )));
        }
        if self.sinks.insert(resource.to_string(), sink).is_none() {
            self.resources.push(resource.to_string());
        }
        Ok(())
    }

    fn subscribe(&mut self, sink: StatusSink) -> TransportResult<()> {
        if self.subscribed {
            return Err(TransportError::SubscribeFailed(
                "channel already subscribed".to_string(),
            ));
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        self.subscribed = true;

        let url = self.url.clone();
        let name = self.name.clone();
        let resources = self.resources.clone();
        let sinks = self.sinks.clone();
        let cancel = self.cancel.clone();
        runtime.spawn(async move {
            run_channel(url, name, resources, sinks, sink, cancel).await;
        });
        Ok(())
    }

    fn teardown(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for WebSocketChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Background task for one WebSocket channel.
async fn run_channel(
    url: String,
    name: String,
    resources: Vec<String>,
    sinks: HashMap<String, ChangeSink>,
    status: StatusSink,
    cancel: CancellationToken,
) {
    let connect_result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
    };

    let ws_stream = match connect_result {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            debug!("channel {} failed to connect to {}: {}", name, url, e);
            status.report(ChannelStatus::Error);
            return;
        }
    };

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    let subscribe = match ClientMessage::subscribe(name.clone(), resources).to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!("channel {} could not encode subscribe: {}", name, e);
            status.report(ChannelStatus::Error);
            return;
        }
    };
    if let Err(e) = ws_sink.send(Message::Text(subscribe.into())).await {
        debug!("channel {} failed to send subscribe: {}", name, e);
        status.report(ChannelStatus::Error);
        return;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws_sink.close().await;
                return;
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text) {
                        Ok(ServerMessage::Subscribed { channel }) if channel == name => {
                            status.report(ChannelStatus::Confirmed);
                        }
                        Ok(ServerMessage::Subscribed { channel }) => {
                            debug!("channel {} ignoring ack for {}", name, channel);
                        }
                        Ok(ServerMessage::Changed { resource }) => {
                            if let Some(sink) = sinks.get(&resource) {
                                sink.notify();
                            }
                        }
                        Ok(ServerMessage::Pong { .. }) => {}
                        Ok(ServerMessage::Error { message }) => {
                            warn!("channel {} rejected by relay: {}", name, message);
                            status.report(ChannelStatus::Error);
                            return;
                        }
                        Err(e) => {
                            warn!("channel {} received malformed message: {}", name, e);
                            status.report(ChannelStatus::Error);
                            return;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("channel {} closed by relay", name);
                        status.report(ChannelStatus::Closed);
                        return;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames carry nothing for us
                    }
                    Some(Err(e)) => {
                        debug!("channel {} socket error: {}", name, e);
                        status.report(ChannelStatus::Error);
                        return;
                    }
                }
            }
        }
    }
}
