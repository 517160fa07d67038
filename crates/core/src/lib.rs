// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sp-core: Shared building blocks for StockPulse live updates.
//!
//! This crate provides the value types and pure policies used by both the
//! `stockpulse` client library and the `sp-remote` relay server:
//! watch-sets, connection and channel status, the reconnect backoff
//! schedule, and the JSON wire protocol.

pub mod backoff;
pub mod error;
pub mod protocol;
pub mod status;
pub mod watch;

pub use backoff::{Backoff, RetryState};
pub use error::{Error, Result};
pub use status::{ChannelStatus, ConnectionState};
pub use watch::WatchSet;
