// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emission envelope handed to listeners

use crate::catalog::{EventKind, GameEvent};
use crate::event::Payload;
use chrono::{DateTime, Utc};

/// One emission: the event plus the metadata the bus stamps on it
///
/// Built fresh by every `emit`; all listeners of that emission see the same
/// envelope, and the bus drops it once delivery completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    event: GameEvent,
    sequence: u64,
    timestamp: DateTime<Utc>,
}

impl Envelope {
    pub(crate) fn new(event: GameEvent, sequence: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            event,
            sequence,
            timestamp,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    pub fn event(&self) -> &GameEvent {
        &self.event
    }

    /// Bus-wide emission counter, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Borrow the payload if it is of type `P`
    pub fn payload<P: Payload>(&self) -> Option<&P> {
        P::from_event(&self.event)
    }
}
