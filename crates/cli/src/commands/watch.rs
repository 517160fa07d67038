// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use sp_core::WatchSet;

use crate::config::Config;
use crate::error::Result;
use crate::sync::{SyncClient, WebSocketTransport};

/// Watches `resources` until Ctrl-C, printing a line per change signal.
pub async fn run(config: &Config, resources: Vec<String>) -> Result<()> {
    run_until(config, resources, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Watches `resources` until `shutdown` completes.
///
/// A malformed relay URL is an error here; once running, relay failures
/// only switch the client to polling.
pub async fn run_until<S>(config: &Config, resources: Vec<String>, shutdown: S) -> Result<()>
where
    S: Future<Output = ()>,
{
    let watch = WatchSet::new(resources)?;
    WebSocketTransport::validate_url(&config.sync.url)?;
    let label = watch.to_string();
    let signals = AtomicU64::new(0);

    info!("watching {} via {}", watch, config.sync.url);
    let client = SyncClient::connect(&config.sync, watch, move || {
        let n = signals.fetch_add(1, Ordering::Relaxed) + 1;
        println!("#{} changed {}", n, label);
    });

    shutdown.await;
    client.dispose();
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
