// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed payload access and the JSON boundary for game events

use crate::catalog::{EventKind, GameEvent};
use crate::error::BusError;
use serde_json::Value;

/// A payload struct bound to exactly one catalog entry
///
/// Implemented for every struct in [`crate::payload`] by the catalog macro,
/// so emitting a payload can never pair it with the wrong kind.
pub trait Payload: Sized + 'static {
    const KIND: EventKind;

    fn into_event(self) -> GameEvent;

    fn from_event(event: &GameEvent) -> Option<&Self>;
}

impl GameEvent {
    /// Build an event from a wire kind and a JSON payload
    ///
    /// A `null` payload is read as `{}` so fieldless coordination events can
    /// be sent without a body.
    pub fn from_wire(kind: &str, payload: Value) -> Result<Self, BusError> {
        let kind: EventKind = kind.parse()?;
        let payload = match payload {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let tagged = serde_json::json!({
            "kind": kind.as_str(),
            "payload": payload,
        });
        serde_json::from_value(tagged).map_err(|e| BusError::InvalidPayload {
            kind,
            message: e.to_string(),
        })
    }

    /// The payload alone, as JSON
    pub fn payload_json(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("payload").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// Borrow the payload if it is of type `P`
    pub fn payload<P: Payload>(&self) -> Option<&P> {
        P::from_event(self)
    }

    /// Wire name of this event's kind
    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

impl<P: Payload> From<P> for GameEvent {
    fn from(payload: P) -> Self {
        payload.into_event()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
