// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event bus

use crate::catalog::{CatalogChange, EventKind};
use crate::registry::SubscriptionId;
use std::fmt;
use thiserror::Error;

/// Errors returned by bus and catalog operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// A name outside the closed catalog was used
    #[error("unknown event kind: {name}")]
    UnknownEventKind { name: String },

    /// A JSON payload doesn't have the shape its kind declares
    #[error("invalid payload for {kind}: {message}")]
    InvalidPayload { kind: EventKind, message: String },

    /// Nested emission went deeper than the configured limit
    #[error("re-entrant emission of {kind} reached depth {depth} (limit {limit})")]
    ReentrantEmissionLimit {
        kind: EventKind,
        depth: usize,
        limit: usize,
    },

    /// Something tried to change the closed catalog
    #[error("event catalog is closed: {0}")]
    CatalogMutation(CatalogChange),
}

/// A listener failed while handling an emission
///
/// Never returned from `emit`; handed to the bus's
/// [`Diagnostics`](crate::Diagnostics) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener {subscription} failed on {kind} (sequence {sequence}): {message}")]
pub struct ListenerError {
    pub kind: EventKind,
    pub subscription: SubscriptionId,
    pub label: Option<String>,
    pub sequence: u64,
    pub message: String,
}

/// The error half of a listener's return value
///
/// Any `std::error::Error` converts into it, so listeners can use `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    message: String,
}

impl ListenerFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E: std::error::Error> From<E> for ListenerFailure {
    fn from(error: E) -> Self {
        Self::new(error.to_string())
    }
}

/// What every listener returns
pub type ListenerResult = Result<(), ListenerFailure>;
