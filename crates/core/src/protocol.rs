// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for live-update channels.
//!
//! The protocol is simple:
//! - Client subscribes one channel to a list of resources
//! - Server acknowledges the subscription, then forwards change signals
//! - Any client may publish a change signal for a resource
//!
//! Change signals carry no payload; receivers re-fetch the resource.

use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe this connection to change signals for `resources`.
    ///
    /// The server answers with `Subscribed` echoing the channel name.
    Subscribe {
        /// Client-chosen channel name.
        channel: String,
        /// Resources to receive change signals for.
        resources: Vec<String>,
    },

    /// Publish a change signal for a resource.
    Notify {
        /// The resource that changed.
        resource: String,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Acknowledges a Subscribe request.
    Subscribed {
        /// Echoed from the Subscribe message.
        channel: String,
    },

    /// A watched resource changed.
    Changed {
        /// The resource that changed.
        resource: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Subscribe message.
    pub fn subscribe(channel: impl Into<String>, resources: Vec<String>) -> Self {
        ClientMessage::Subscribe {
            channel: channel.into(),
            resources,
        }
    }

    /// Creates a Notify message.
    pub fn notify(resource: impl Into<String>) -> Self {
        ClientMessage::Notify {
            resource: resource.into(),
        }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates a Subscribed message.
    pub fn subscribed(channel: impl Into<String>) -> Self {
        ServerMessage::Subscribed {
            channel: channel.into(),
        }
    }

    /// Creates a Changed message.
    pub fn changed(resource: impl Into<String>) -> Self {
        ServerMessage::Changed {
            resource: resource.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
