// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live-update synchronization for back-office views.
//!
//! Keeps a caller's "something changed, re-fetch" callback fresh by watching
//! named resources over a push channel, with polling as the fallback.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  SyncClient │────►│  Transport  │────►│    Relay    │
//! │   (task)    │◄────│  (channel)  │◄────│   Server    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Controller  │────►│   Poller    │  (fallback while degraded)
//! │ (state mach)│     │             │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Features
//!
//! - One push channel per watch-set, confirmed within a bounded window
//! - Fixed-interval polling whenever push is not confirmed healthy
//! - Automatic reconnect with capped exponential backoff
//! - Stale channel events filtered by handle id
//! - Injectable transport trait for testing

mod binding;
mod callback;
mod client;
mod controller;
mod poller;
mod transport;

pub use binding::LiveBinding;
pub use client::{SyncClient, SyncConfig};
pub use poller::DEFAULT_POLL_INTERVAL_MS;
pub use transport::{
    ChangeSink, Channel, HandleId, StatusSink, Transport, TransportError, TransportResult,
    WebSocketChannel, WebSocketTransport,
};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod transport_tests;
