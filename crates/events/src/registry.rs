// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription bookkeeping
//!
//! The registry maps each event kind to its listeners in registration
//! order. Dispatch works on a snapshot of that list, and every slot carries
//! an `active` flag so removal during a dispatch pass is seen by the pass
//! without touching the snapshot itself.

use crate::bus::EventBus;
use crate::catalog::EventKind;
use crate::envelope::Envelope;
use crate::error::ListenerResult;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of per-registry owner ids, so handles from one bus never match
/// slots on another
static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Unique id of a subscription within one bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// How a listener is registered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Remove the subscription right before its first invocation
    pub once: bool,
    /// Name reported alongside listener failures
    pub label: Option<String>,
}

impl SubscribeOptions {
    pub fn once() -> Self {
        Self {
            once: true,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Handle for a registered listener, used to unsubscribe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    owner: u64,
    id: SubscriptionId,
    kind: EventKind,
    once: bool,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_once(&self) -> bool {
        self.once
    }
}

pub(crate) type Listener = Rc<dyn Fn(&Envelope, &EventBus) -> ListenerResult>;

/// A registered listener
pub(crate) struct Slot {
    pub(crate) id: SubscriptionId,
    pub(crate) kind: EventKind,
    pub(crate) once: bool,
    pub(crate) label: Option<String>,
    listener: Listener,
    active: Cell<bool>,
}

impl Slot {
    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }
}

/// Event kind → listeners, in registration order
pub(crate) struct Registry {
    owner: u64,
    lists: HashMap<EventKind, Vec<Rc<Slot>>>,
    next_id: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            lists: HashMap::new(),
            next_id: 0,
        }
    }

    /// Whether `subscription` was handed out by this registry
    pub(crate) fn owns(&self, subscription: &Subscription) -> bool {
        subscription.owner == self.owner
    }

    /// Append a listener to the end of `kind`'s list
    pub(crate) fn insert(
        &mut self,
        kind: EventKind,
        listener: Listener,
        options: SubscribeOptions,
    ) -> Subscription {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);

        self.lists.entry(kind).or_default().push(Rc::new(Slot {
            id,
            kind,
            once: options.once,
            label: options.label,
            listener,
            active: Cell::new(true),
        }));

        Subscription {
            owner: self.owner,
            id,
            kind,
            once: options.once,
        }
    }

    /// Remove a subscription; false if it was already gone
    pub(crate) fn remove(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let Some(list) = self.lists.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|slot| slot.id == id) else {
            return false;
        };

        let slot = list.remove(pos);
        slot.active.set(false);

        // Kinds with no listeners left are dropped entirely
        if list.is_empty() {
            self.lists.remove(&kind);
        }
        true
    }

    /// Listeners for `kind` as of now; later mutations don't affect it
    pub(crate) fn snapshot(&self, kind: EventKind) -> Vec<Rc<Slot>> {
        self.lists.get(&kind).cloned().unwrap_or_default()
    }

    /// Remove every subscription of `kind`, returning how many there were
    pub(crate) fn clear(&mut self, kind: EventKind) -> usize {
        let removed = self.lists.remove(&kind).unwrap_or_default();
        for slot in &removed {
            slot.active.set(false);
        }
        removed.len()
    }

    pub(crate) fn clear_all(&mut self) -> usize {
        let mut count = 0;
        for (_, list) in self.lists.drain() {
            for slot in &list {
                slot.active.set(false);
            }
            count += list.len();
        }
        count
    }

    pub(crate) fn len(&self, kind: EventKind) -> usize {
        self.lists.get(&kind).map_or(0, Vec::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Kinds with at least one listener, in catalog order
    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<_> = self.lists.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Handles of every live subscription, ordered by kind then registration
    pub(crate) fn subscriptions(&self) -> Vec<Subscription> {
        self.kinds()
            .into_iter()
            .flat_map(|kind| self.snapshot(kind))
            .map(|slot| Subscription {
                owner: self.owner,
                id: slot.id,
                kind: slot.kind,
                once: slot.once,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
