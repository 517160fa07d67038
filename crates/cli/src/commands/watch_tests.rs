// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use crate::sync::TransportError;
use std::time::Duration;

fn unreachable_relay() -> Config {
    Config::default().with_url(Some("ws://127.0.0.1:1".to_string()))
}

#[tokio::test]
async fn test_empty_watch_set_is_rejected() {
    let err = run_until(&unreachable_relay(), vec![], async {})
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Core(sp_core::Error::EmptyWatchSet)));
}

#[tokio::test]
async fn test_blank_resource_is_rejected() {
    let resources = vec!["products".to_string(), " ".to_string()];
    let err = run_until(&unreachable_relay(), resources, async {})
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Core(sp_core::Error::InvalidResource(_))));
}

#[tokio::test]
async fn test_non_websocket_url_is_rejected() {
    let config = Config::default().with_url(Some("http://not-a-ws-url".to_string()));
    let resources = vec!["products".to_string()];
    let err = run_until(&config, resources, tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn test_unparseable_url_is_rejected() {
    let config = Config::default().with_url(Some("ws://bad host".to_string()));
    let err = run_until(&config, vec!["products".to_string()], async {})
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ws://bad host"));
}

#[tokio::test]
async fn test_returns_once_shutdown_completes() {
    let resources = vec!["products".to_string()];
    run_until(
        &unreachable_relay(),
        resources,
        tokio::time::sleep(Duration::from_millis(50)),
    )
    .await
    .unwrap();
}
