// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections, subscription tracking, and change fanout.

use std::collections::HashSet;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use sp_core::protocol::{ClientMessage, ServerMessage};

use crate::state::RelayState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the relay on the given address.
pub async fn run(addr: SocketAddr, state: RelayState) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await
}

/// Accept connections from an already bound listener until it fails.
pub async fn serve(listener: TcpListener, state: RelayState) -> Result<(), BoxError> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Resources one connection has subscribed to.
#[derive(Debug, Default)]
pub(crate) struct Session {
    subscriptions: HashSet<String>,
}

impl Session {
    pub(crate) fn is_subscribed(&self, resource: &str) -> bool {
        self.subscriptions.contains(resource)
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: RelayState,
) -> Result<(), BoxError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let mut changes = state.subscribe();
    let mut session = Session::default();

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(response) = handle_client_message(&text, &mut session, &state) {
                            let json = response.to_json()?;
                            ws_sink.send(Message::Text(json.into())).await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong and raw frames carry nothing for the relay
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            change = changes.recv() => {
                match change {
                    Ok(resource) if session.is_subscribed(&resource) => {
                        let json = ServerMessage::changed(resource).to_json()?;
                        if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                            warn!("Failed to forward change to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} change signals", peer_addr, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return an optional response.
///
/// Malformed input is answered with an error message rather than closing
/// the connection.
pub(crate) fn handle_client_message(
    text: &str,
    session: &mut Session,
    state: &RelayState,
) -> Option<ServerMessage> {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Malformed client message: {}", e);
            return Some(ServerMessage::error(format!("malformed message: {}", e)));
        }
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::Subscribe { channel, resources } => {
            if resources.iter().any(|r| r.trim().is_empty()) {
                return Some(ServerMessage::error("resource names must be non-blank"));
            }
            debug!("Channel {} subscribed to {:?}", channel, resources);
            session.subscriptions.extend(resources);
            Some(ServerMessage::subscribed(channel))
        }

        ClientMessage::Notify { resource } => {
            let reached = state.publish(resource.as_str());
            debug!("Change to {} published to {} connections", resource, reached);
            None
        }

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            Some(ServerMessage::pong(id))
        }
    }
}
