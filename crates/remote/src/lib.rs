// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sp-remote: WebSocket relay for StockPulse live updates.
//!
//! Clients subscribe a channel to a list of resources; any client may
//! publish a change signal for a resource, which the relay forwards to every
//! connection subscribed to it. The relay stores nothing.

pub mod server;
pub mod state;

pub use server::{run, serve};
pub use state::RelayState;
