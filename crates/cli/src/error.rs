// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TransportError;

/// All possible errors that can occur in the stockpulse library.
///
/// Live clients never surface errors once running; these cover setup
/// (configuration, watch-sets) and the one-shot CLI commands.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] sp_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("websocket error: {0}\n  hint: is the relay running? start it with 'sp-remote'")]
    WebSocket(String),

    #[error("relay rejected request: {0}")]
    Rejected(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for stockpulse operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
