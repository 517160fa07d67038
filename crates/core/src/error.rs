// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sp-core operations.

use thiserror::Error;

/// All possible errors that can occur in sp-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("empty watch set\n  hint: a live client must watch at least one resource")]
    EmptyWatchSet,

    #[error("invalid resource name: '{0}'\n  hint: resource names must be non-blank")]
    InvalidResource(String),
}

/// A specialized Result type for sp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
