// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use sp_core::protocol::{ClientMessage, ServerMessage};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::WebSocketTransport;

/// Max time to reach the relay and get the notification acknowledged.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes a change signal for `resource` through the relay.
///
/// Returns once the relay has processed the notification: a ping is sent
/// right after it and the relay answers in order.
pub async fn run(config: &Config, resource: String) -> Result<()> {
    let resource = resource.trim().to_string();
    if resource.is_empty() {
        return Err(sp_core::Error::InvalidResource(resource).into());
    }
    WebSocketTransport::validate_url(&config.sync.url)?;

    tokio::time::timeout(NOTIFY_TIMEOUT, publish(&config.sync.url, &resource))
        .await
        .map_err(|_| Error::WebSocket(format!("no answer from {}", config.sync.url)))??;

    println!("notified {}", resource);
    Ok(())
}

async fn publish(url: &str, resource: &str) -> Result<()> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| Error::WebSocket(format!("{}: {}", url, e)))?;
    let (mut sink, mut stream) = ws_stream.split();

    const PING_ID: u64 = 1;
    for msg in [ClientMessage::notify(resource), ClientMessage::ping(PING_ID)] {
        sink.send(Message::Text(msg.to_json()?.into()))
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))?;
    }

    while let Some(msg) = stream.next().await {
        let msg = msg.map_err(|e| Error::WebSocket(e.to_string()))?;
        let Message::Text(text) = msg else {
            continue;
        };
        match ServerMessage::from_json(&text)? {
            ServerMessage::Pong { id } if id == PING_ID => {
                debug!("relay acknowledged change to {}", resource);
                let _ = sink.close().await;
                return Ok(());
            }
            ServerMessage::Error { message } => return Err(Error::Rejected(message)),
            other => debug!("ignoring {:?}", other),
        }
    }

    Err(Error::WebSocket("relay closed the connection".to_string()))
}
