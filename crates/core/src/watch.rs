// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Watch-sets: the resource names a live client monitors.
//!
//! A watch-set is ordered and duplicate-free. Its identity (together with any
//! caller-supplied dependency key) decides when a client must be re-created,
//! so it is immutable once built.

use std::fmt;

use crate::error::{Error, Result};

/// Prefix for channel names derived from a watch-set.
const CHANNEL_PREFIX: &str = "live";

/// An ordered, non-empty set of resource names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchSet {
    resources: Vec<String>,
}

impl WatchSet {
    /// Builds a watch-set from resource names, keeping first-seen order.
    ///
    /// Surrounding whitespace is trimmed and repeated names are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResource`] for a blank name and
    /// [`Error::EmptyWatchSet`] when no names are given.
    pub fn new<I, S>(resources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for resource in resources {
            let raw = resource.as_ref();
            let name = raw.trim();
            if name.is_empty() {
                return Err(Error::InvalidResource(raw.to_string()));
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        if names.is_empty() {
            return Err(Error::EmptyWatchSet);
        }

        Ok(WatchSet { resources: names })
    }

    /// Returns the resource names in watch order.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Iterates over the resource names in watch order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.resources.iter()
    }

    /// Number of watched resources. Never zero.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Name of the single push channel that carries every resource in the set.
    pub fn channel_name(&self) -> String {
        format!("{}:{}", CHANNEL_PREFIX, self.resources.join(","))
    }
}

impl fmt::Display for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.resources.join(", "))
    }
}

impl<'a> IntoIterator for &'a WatchSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
