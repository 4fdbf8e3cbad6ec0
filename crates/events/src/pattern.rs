// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wildcard selection of event kinds

use crate::catalog::EventKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern over wire names: `"player:hit"`, `"player:*"`, `"*"` or `"**"`
///
/// Segments are separated by `:`. A `*` segment matches exactly one
/// segment and `**` matches everything that remains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Pattern selecting every kind
    pub fn all() -> Self {
        Self::new("**")
    }

    /// Pattern selecting one domain, e.g. `player:*`
    pub fn domain(domain: &str) -> Self {
        Self(format!("{domain}:*"))
    }

    pub fn matches(&self, kind: EventKind) -> bool {
        self.matches_name(kind.as_str())
    }

    /// Check a raw wire name
    pub fn matches_name(&self, name: &str) -> bool {
        match self.0.as_str() {
            "" => return false,
            "*" | "**" => return true,
            _ => {}
        }

        let mut segments = name.split(':');
        for want in self.0.split(':') {
            match (want, segments.next()) {
                ("**", _) => return true,
                (_, None) => return false,
                ("*", Some(_)) => {}
                (want, Some(got)) if want != got => return false,
                _ => {}
            }
        }
        segments.next().is_none()
    }

    /// Catalog kinds this pattern selects, in catalog order
    pub fn kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.matches(*kind))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<EventKind> for EventPattern {
    fn from(kind: EventKind) -> Self {
        Self::new(kind.as_str())
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
