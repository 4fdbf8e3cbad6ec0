// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only export of the catalog and checks against external vocabularies
//!
//! Clients outside the crate (a browser front end, a replay tool) carry
//! their own copy of the symbolic-name table. `Catalog::verify_vocabulary`
//! rejects any copy that adds, drops or renames an entry, since the catalog
//! itself can only change with a rebuild.

use super::EventKind;
use crate::error::BusError;
use std::collections::BTreeMap;
use std::fmt;

/// A difference between an external vocabulary and the closed catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    /// The external table declares a symbol the catalog does not have
    Added { symbol: String, wire: String },
    /// The external table lacks a catalog symbol
    Removed { symbol: String },
    /// The external table maps a catalog symbol to a different wire string
    Renamed {
        symbol: String,
        expected: String,
        found: String,
    },
}

impl CatalogChange {
    pub fn symbol(&self) -> &str {
        match self {
            CatalogChange::Added { symbol, .. }
            | CatalogChange::Removed { symbol }
            | CatalogChange::Renamed { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for CatalogChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogChange::Added { symbol, wire } => {
                write!(f, "cannot add {} = {:?}", symbol, wire)
            }
            CatalogChange::Removed { symbol } => write!(f, "cannot remove {}", symbol),
            CatalogChange::Renamed {
                symbol,
                expected,
                found,
            } => write!(
                f,
                "cannot rename {} from {:?} to {:?}",
                symbol, expected, found
            ),
        }
    }
}

/// Read-only view over the event catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    /// `(symbol, wire)` pairs in catalog order
    pub fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
        EventKind::ALL.iter().map(|k| (k.symbol(), k.as_str()))
    }

    /// The symbol → wire mapping, as the client constant tables express it
    pub fn export() -> BTreeMap<&'static str, &'static str> {
        Self::entries().collect()
    }

    pub fn len() -> usize {
        EventKind::COUNT
    }

    pub fn contains(wire: &str) -> bool {
        wire.parse::<EventKind>().is_ok()
    }

    /// Every difference between `external` and the catalog, sorted by symbol
    pub fn vocabulary_diff<K, V>(external: &BTreeMap<K, V>) -> Vec<CatalogChange>
    where
        K: AsRef<str> + Ord,
        V: AsRef<str>,
    {
        let mut changes = Vec::new();

        for (symbol, wire) in external {
            let (symbol, wire) = (symbol.as_ref(), wire.as_ref());
            match EventKind::from_symbol(symbol) {
                Ok(kind) if kind.as_str() == wire => {}
                Ok(kind) => changes.push(CatalogChange::Renamed {
                    symbol: symbol.to_string(),
                    expected: kind.as_str().to_string(),
                    found: wire.to_string(),
                }),
                Err(_) => changes.push(CatalogChange::Added {
                    symbol: symbol.to_string(),
                    wire: wire.to_string(),
                }),
            }
        }

        for kind in EventKind::ALL {
            if !external.keys().any(|k| k.as_ref() == kind.symbol()) {
                changes.push(CatalogChange::Removed {
                    symbol: kind.symbol().to_string(),
                });
            }
        }

        changes.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        changes
    }

    /// Accept `external` only if it matches the catalog exactly
    pub fn verify_vocabulary<K, V>(external: &BTreeMap<K, V>) -> Result<(), BusError>
    where
        K: AsRef<str> + Ord,
        V: AsRef<str>,
    {
        let changes = Self::vocabulary_diff(external);
        if let Some(first) = changes.into_iter().next() {
            tracing::error!(symbol = first.symbol(), "rejected catalog mutation: {}", first);
            return Err(BusError::CatalogMutation(first));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "vocabulary_tests.rs"]
mod tests;
