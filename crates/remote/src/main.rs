// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sp-remote: WebSocket relay server for StockPulse live updates.

use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sp_remote::RelayState;

/// sp-remote: live-update relay server
#[derive(Parser, Debug)]
#[command(name = "sp-remote")]
#[command(about = "WebSocket relay server for StockPulse live updates")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Enable verbose logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()?;

    info!("Starting sp-remote relay");
    info!("  Bind address: {}", args.bind);

    sp_remote::run(args.bind, RelayState::new()).await
}
