// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! stockpulse - live-update client for StockPulse back-office views.
//!
//! Keeps a view's "something changed, re-fetch" callback firing while the
//! view is open: push signals through a WebSocket relay when it is healthy,
//! fixed-interval polling when it is not.
//!
//! # Main Components
//!
//! - [`sync::SyncClient`] - one live client per watch-set, disposed when the view closes
//! - [`sync::LiveBinding`] - re-creates the client when the view's inputs change
//! - [`Config`] - TOML configuration for relay URL and timings
//! - [`Error`] - Error types for setup and CLI operations
//!
//! ```rust,ignore
//! use sp_core::WatchSet;
//! use stockpulse::sync::{SyncClient, SyncConfig};
//!
//! let watch = WatchSet::new(["products", "sales"])?;
//! let client = SyncClient::connect(&SyncConfig::default(), watch, || refresh_view());
//! // ...
//! client.dispose();
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{Error, Result};

/// Resolves configuration for a CLI invocation.
///
/// The file comes from `--config`, then `STOCKPULSE_CONFIG`; without either
/// the defaults apply. The relay URL comes from `--url`, then
/// `STOCKPULSE_URL`, then the file.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(env::config_path);
    let config = match path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    Ok(config.with_url(cli.url.clone().or_else(env::relay_url)))
}

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;

    rt.block_on(async move {
        match cli.command {
            Command::Watch { resources } => commands::watch::run(&config, resources).await,
            Command::Notify { resource } => commands::notify::run(&config, resource).await,
        }
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
