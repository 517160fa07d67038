// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration management.
//!
//! Configuration is a TOML file with a single `[sync]` table:
//!
//! ```toml
//! [sync]
//! url = "ws://relay.example:7890"
//! poll_interval_ms = 30000
//! confirm_timeout_ms = 10000
//! settle_delay_ms = 0
//! backoff_base_ms = 5000
//! backoff_cap_ms = 300000
//! ```
//!
//! Every key is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::sync::SyncConfig;

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Live-update client settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.sync.validate()?;
        Ok(config)
    }

    /// Replaces the relay URL when an override is given.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.sync.url = url;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
