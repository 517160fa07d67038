// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "stockpulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live-update client for StockPulse back-office views")]
#[command(
    long_about = "Live-update client for StockPulse back-office views.\n\n\
    Watches named resources through a push relay, falling back to polling while \
    the relay is unreachable."
)]
pub struct Cli {
    /// Config file (TOML with a [sync] table)
    #[arg(short = 'c', long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Relay URL, overriding the config file
    #[arg(short = 'u', long, global = true, value_name = "url")]
    pub url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch resources and print a line whenever they may have changed
    #[command(arg_required_else_help = true)]
    #[command(after_help = "\
Examples:
  stockpulse watch products              Watch one resource
  stockpulse watch products sales        Watch several over one channel")]
    Watch {
        /// Resource names
        #[arg(required = true, value_parser = non_empty_string)]
        resources: Vec<String>,
    },

    /// Publish a change signal for a resource through the relay
    #[command(arg_required_else_help = true)]
    Notify {
        /// Resource name
        #[arg(value_parser = non_empty_string)]
        resource: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
