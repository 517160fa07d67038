// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    subscribe = { ClientMessage::subscribe("live:products", vec!["products".to_string()]) },
    notify = { ClientMessage::notify("sales") },
    ping = { ClientMessage::ping(12345) },
)]
fn client_message_roundtrip(msg: ClientMessage) {
    let json = msg.to_json().unwrap();
    let parsed = ClientMessage::from_json(&json).unwrap();
    assert_eq!(msg, parsed);
}

#[parameterized(
    subscribed = { ServerMessage::subscribed("live:products") },
    changed = { ServerMessage::changed("products") },
    pong = { ServerMessage::pong(12345) },
    error = { ServerMessage::error("Something went wrong") },
)]
fn server_message_roundtrip(msg: ServerMessage) {
    let json = msg.to_json().unwrap();
    let parsed = ServerMessage::from_json(&json).unwrap();
    assert_eq!(msg, parsed);
}

#[test]
fn message_json_format() {
    let msg = ClientMessage::subscribe("live:sales", vec!["sales".to_string()]);
    let json = msg.to_json().unwrap();
    assert!(json.contains("\"type\":\"subscribe\""));
    assert!(json.contains("\"channel\":\"live:sales\""));
    assert!(json.contains("\"resources\":[\"sales\"]"));

    let msg = ServerMessage::changed("stock_transfers");
    let json = msg.to_json().unwrap();
    assert!(json.contains("\"type\":\"changed\""));
    assert!(json.contains("\"resource\":\"stock_transfers\""));
}

#[test]
fn parses_hand_written_json() {
    let msg = ServerMessage::from_json(r#"{"type":"subscribed","channel":"live:a"}"#).unwrap();
    assert_eq!(msg, ServerMessage::subscribed("live:a"));

    let msg = ClientMessage::from_json(r#"{"type":"notify","resource":"customers"}"#).unwrap();
    assert_eq!(msg, ClientMessage::notify("customers"));
}

#[test]
fn rejects_unknown_type() {
    assert!(ServerMessage::from_json(r#"{"type":"op"}"#).is_err());
}
