// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Test helpers are shared across multiple test binaries, and not every test
// file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::net::SocketAddr;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tokio::net::TcpListener;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

use sp_remote::RelayState;

pub fn stockpulse() -> Command {
    cargo_bin_cmd!("stockpulse")
}

/// Returns timeout duration, longer for CI environments.
pub fn timeout() -> Duration {
    if std::env::var("CI").is_ok() {
        Duration::from_secs(30)
    } else {
        Duration::from_secs(5)
    }
}

/// An in-process relay on a random port.
pub struct Relay {
    pub addr: SocketAddr,
    pub state: RelayState,
    task: tokio::task::JoinHandle<()>,
}

impl Relay {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener)
    }

    /// Starts a relay on a specific address.
    pub async fn start_at(addr: SocketAddr) -> Self {
        let listener = TcpListener::bind(addr).await.unwrap();
        Self::serve(listener)
    }

    fn serve(listener: TcpListener) -> Self {
        let addr = listener.local_addr().unwrap();
        let state = RelayState::new();
        let serve_state = state.clone();
        let task = tokio::spawn(async move {
            let _ = sp_remote::serve(listener, serve_state).await;
        });
        Relay { addr, state, task }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Polls `check` every 20ms until it holds or the timeout runs out.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout();
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
