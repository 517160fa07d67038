// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    /// Relay URL, overriding the config file.
    pub const STOCKPULSE_URL: &str = "STOCKPULSE_URL";
    /// Config file used when `--config` is not given.
    pub const STOCKPULSE_CONFIG: &str = "STOCKPULSE_CONFIG";
}

/// Returns the value of `STOCKPULSE_URL` if set and non-empty.
pub fn relay_url() -> Option<String> {
    std::env::var(vars::STOCKPULSE_URL)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the value of `STOCKPULSE_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::STOCKPULSE_CONFIG)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
