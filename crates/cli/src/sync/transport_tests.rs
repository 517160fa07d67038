// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::transport::{
    ChangeSink, Channel, ChannelEvent, StatusSink, Transport, TransportError, WebSocketTransport,
};
use futures_util::StreamExt;
use sp_core::protocol::ClientMessage;
use sp_core::ChannelStatus;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use yare::parameterized;

#[parameterized(
    http = { "http://localhost:7890" },
    bare_host = { "localhost:7890" },
    empty = { "" },
)]
fn create_channel_rejects_non_websocket_urls(url: &str) {
    let transport = WebSocketTransport::new(url);
    let err = transport.create_channel("live:products").err().unwrap();
    assert!(matches!(err, TransportError::InvalidUrl { .. }));
    assert!(err.to_string().contains("ws://"));
}

#[test]
fn create_channel_rejects_unparseable_url() {
    let transport = WebSocketTransport::new("ws://bad host");
    let err = transport.create_channel("live:products").err().unwrap();
    assert!(matches!(err, TransportError::InvalidUrl { .. }));
}

#[parameterized(
    ws = { "ws://127.0.0.1:7890" },
    wss = { "wss://relay.example/live" },
)]
fn validate_url_accepts_websocket_urls(url: &str) {
    assert!(WebSocketTransport::validate_url(url).is_ok());
}

#[parameterized(
    http = { "http://not-a-ws-url" },
    bad_host = { "ws://bad host" },
)]
fn validate_url_rejects(url: &str) {
    let err = WebSocketTransport::validate_url(url).err().unwrap();
    assert!(matches!(err, TransportError::InvalidUrl { .. }));
    assert!(err.to_string().contains(url));
}

#[test]
fn create_channel_does_not_connect() {
    // Nothing listens on port 1; creation must still succeed
    let transport = WebSocketTransport::new("ws://127.0.0.1:1");
    assert!(transport.create_channel("live:products").is_ok());
    assert_eq!(transport.url(), "ws://127.0.0.1:1");
}

#[test]
fn subscribe_without_runtime_fails() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let transport = WebSocketTransport::new("ws://127.0.0.1:1");
    let mut channel = transport.create_channel("live:products").unwrap();
    channel
        .register_resource("products", ChangeSink::new(1, "products", tx.clone()))
        .unwrap();

    let err = channel.subscribe(StatusSink::new(1, tx)).err().unwrap();
    assert!(matches!(err, TransportError::NoRuntime));
}

#[tokio::test]
async fn register_after_subscribe_fails() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let transport = WebSocketTransport::new("ws://127.0.0.1:1");
    let mut channel = transport.create_channel("live:products").unwrap();
    channel.subscribe(StatusSink::new(1, tx.clone())).unwrap();

    let err = channel
        .register_resource("products", ChangeSink::new(1, "products", tx.clone()))
        .err()
        .unwrap();
    assert!(matches!(err, TransportError::SubscribeFailed(_)));

    let err = channel.subscribe(StatusSink::new(1, tx)).err().unwrap();
    assert!(matches!(err, TransportError::SubscribeFailed(_)));
    channel.teardown();
}

#[tokio::test]
async fn unreachable_relay_reports_error() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let transport = WebSocketTransport::new("ws://127.0.0.1:1");
    let mut channel = transport.create_channel("live:products").unwrap();
    channel
        .register_resource("products", ChangeSink::new(7, "products", tx.clone()))
        .unwrap();
    channel.subscribe(StatusSink::new(7, tx)).unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        ChannelEvent::Status {
            handle: 7,
            status: ChannelStatus::Error
        }
    );
}

#[test]
fn sinks_tag_events_with_their_handle() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let change = ChangeSink::new(3, "sales", tx.clone());
    let status = StatusSink::new(4, tx);

    assert_eq!(change.resource(), "sales");
    change.notify();
    status.report(ChannelStatus::Confirmed);

    let first = rx.try_recv().unwrap();
    assert_eq!(
        first,
        ChannelEvent::Changed {
            handle: 3,
            resource: "sales".to_string()
        }
    );
    assert_eq!(first.handle(), 3);
    assert_eq!(rx.try_recv().unwrap().handle(), 4);
}

#[test]
fn sinks_ignore_a_closed_receiver() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    ChangeSink::new(1, "sales", tx.clone()).notify();
    StatusSink::new(1, tx).report(ChannelStatus::Closed);
}

#[tokio::test]
async fn subscribe_lists_resources_in_registration_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let relay = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        loop {
            if let Message::Text(text) = ws.next().await.unwrap().unwrap() {
                return ClientMessage::from_json(&text).unwrap();
            }
        }
    });

    let (tx, _rx) = mpsc::unbounded_channel();
    let transport = WebSocketTransport::new(format!("ws://{}", addr));
    let mut channel = transport.create_channel("live:sales,products").unwrap();
    for resource in ["sales", "products"] {
        channel
            .register_resource(resource, ChangeSink::new(1, resource, tx.clone()))
            .unwrap();
    }
    channel.subscribe(StatusSink::new(1, tx)).unwrap();

    let subscribe = tokio::time::timeout(Duration::from_secs(5), relay)
        .await
        .expect("no subscribe message")
        .unwrap();
    assert_eq!(
        subscribe,
        ClientMessage::subscribe(
            "live:sales,products",
            vec!["sales".to_string(), "products".to_string()]
        )
    );
    channel.teardown();
}
