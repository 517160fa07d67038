// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn keeps_first_seen_order() {
    let set = WatchSet::new(["sales", "products", "stock_transfers"]).unwrap();
    assert_eq!(set.resources(), ["sales", "products", "stock_transfers"]);
    assert_eq!(set.len(), 3);
    assert!(!set.is_empty());
}

#[test]
fn drops_duplicates_and_trims() {
    let set = WatchSet::new(["sales", " products ", "sales"]).unwrap();
    assert_eq!(set.resources(), ["sales", "products"]);
}

#[test]
fn rejects_empty_set() {
    let names: Vec<String> = Vec::new();
    let err = WatchSet::new(names).unwrap_err();
    assert!(matches!(err, Error::EmptyWatchSet));
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    tab = { "\t" },
)]
fn rejects_blank_names(name: &str) {
    let err = WatchSet::new(["sales", name]).unwrap_err();
    assert!(matches!(err, Error::InvalidResource(_)));
}

#[test]
fn channel_name_covers_every_resource() {
    let set = WatchSet::new(["products", "sales"]).unwrap();
    assert_eq!(set.channel_name(), "live:products,sales");
}

#[test]
fn equality_follows_order() {
    let a = WatchSet::new(["products", "sales"]).unwrap();
    let b = WatchSet::new(["products", "sales"]).unwrap();
    let c = WatchSet::new(["sales", "products"]).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn display_and_iteration() {
    let set = WatchSet::new(["customers", "sales"]).unwrap();
    assert_eq!(set.to_string(), "[customers, sales]");
    let collected: Vec<&String> = (&set).into_iter().collect();
    assert_eq!(collected.len(), 2);
}
