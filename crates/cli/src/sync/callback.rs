// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gate around the caller's change callback.
//!
//! Every invocation path (poller ticks, channel change signals) goes through
//! [`ChangeCallback::invoke`]. Closing the gate waits for an in-flight
//! invocation to finish, so once `close` returns the callback never runs
//! again. A panicking callback is logged and swallowed.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

thread_local! {
    /// Gate currently invoking on this thread, if any.
    static INVOKING: Cell<usize> = const { Cell::new(0) };
}

struct Gate {
    open: AtomicBool,
    /// Held for the duration of each invocation.
    running: Mutex<()>,
    callback: Box<dyn Fn() + Send + Sync>,
}

/// Shared, closable handle to the caller's `on_change` callback.
#[derive(Clone)]
pub(crate) struct ChangeCallback {
    gate: Arc<Gate>,
}

impl ChangeCallback {
    pub(crate) fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        ChangeCallback {
            gate: Arc::new(Gate {
                open: AtomicBool::new(true),
                running: Mutex::new(()),
                callback: Box::new(callback),
            }),
        }
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.gate) as usize
    }

    /// Runs the callback unless the gate is closed.
    ///
    /// Returns true if the callback ran (even if it panicked).
    pub(crate) fn invoke(&self) -> bool {
        let _running = self
            .gate
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.gate.open.load(Ordering::Acquire) {
            return false;
        }

        let outer = INVOKING.with(|current| current.replace(self.id()));
        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.gate.callback)()));
        INVOKING.with(|current| current.set(outer));

        if let Err(payload) = result {
            warn!("change callback panicked: {}", panic_message(&*payload));
        }
        true
    }

    /// Closes the gate and waits out any in-flight invocation.
    ///
    /// Safe to call from inside the callback itself; in that case the
    /// current invocation is the one in flight and is not waited on.
    pub(crate) fn close(&self) {
        self.gate.open.store(false, Ordering::Release);
        if INVOKING.with(|current| current.get()) == self.id() {
            return;
        }
        drop(
            self.gate
                .running
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
    }

    pub(crate) fn is_open(&self) -> bool {
        self.gate.open.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ChangeCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeCallback")
            .field("open", &self.is_open())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic>"
    }
}

#[cfg(test)]
#[path = "callback_tests.rs"]
mod tests;
