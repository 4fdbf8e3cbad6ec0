// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where listener failures go
//!
//! A failing listener never interrupts delivery. The bus reports the
//! failure here, exactly once per failed invocation, and moves on.

use crate::error::ListenerError;
use std::cell::RefCell;
use std::rc::Rc;

/// Sink for listener failures
pub trait Diagnostics {
    fn listener_failed(&self, error: &ListenerError);
}

/// Reports failures as `warn` events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn listener_failed(&self, error: &ListenerError) {
        tracing::warn!(
            kind = %error.kind,
            subscription = %error.subscription,
            label = error.label.as_deref().unwrap_or("-"),
            sequence = error.sequence,
            "listener failed: {}",
            error.message
        );
    }
}

/// Keeps every reported failure for later inspection
///
/// Clones share the same storage, so a test can hand one clone to the bus
/// and assert on the other.
#[derive(Debug, Clone, Default)]
pub struct CollectingDiagnostics {
    errors: Rc<RefCell<Vec<ListenerError>>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All failures reported so far, oldest first
    pub fn errors(&self) -> Vec<ListenerError> {
        self.errors.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.errors.borrow_mut().clear();
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn listener_failed(&self, error: &ListenerError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
