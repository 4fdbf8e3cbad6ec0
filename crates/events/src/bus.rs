// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous publish/subscribe bus
//!
//! `emit` runs every listener of the event's kind, in registration order,
//! before it returns. Listeners may subscribe, unsubscribe and emit from
//! inside a dispatch:
//! - each dispatch works on a snapshot of the kind's listeners taken when
//!   it starts, so listeners added mid-dispatch wait for the next emission
//! - a listener removed mid-dispatch is skipped if it hasn't run yet
//! - nested emissions complete before the outer dispatch moves on
//!
//! The registry is never borrowed while a listener runs.

use crate::catalog::{EventKind, GameEvent};
use crate::clock::{Clock, SystemClock};
use crate::config::BusConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::envelope::Envelope;
use crate::error::{BusError, ListenerError, ListenerFailure, ListenerResult};
use crate::event::Payload;
use crate::pattern::EventPattern;
use crate::registry::{Listener, Registry, SubscribeOptions, Subscription};
use serde_json::Value;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Outcome of one emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub kind: EventKind,
    pub sequence: u64,
    /// Listeners that returned `Ok`
    pub delivered: usize,
    /// Listeners that returned `Err` or panicked
    pub failed: usize,
}

impl Delivery {
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed
    }
}

type Observer = Rc<dyn Fn(&Envelope)>;

/// Where the recursion limit tripped
#[derive(Debug, Clone, Copy)]
struct Abort {
    kind: EventKind,
    depth: usize,
}

impl Abort {
    fn error(self, limit: usize) -> BusError {
        BusError::ReentrantEmissionLimit {
            kind: self.kind,
            depth: self.depth,
            limit,
        }
    }
}

struct BusState {
    registry: RefCell<Registry>,
    sequence: Cell<u64>,
    depth: Cell<usize>,
    aborted: Cell<Option<Abort>>,
    observer: RefCell<Option<Observer>>,
    diagnostics: Rc<dyn Diagnostics>,
    clock: Box<dyn Clock>,
    config: BusConfig,
}

/// Handle to an event bus
///
/// Clones share the same registry and sequence counter. The handle is
/// neither `Send` nor `Sync`: dispatch happens on one thread.
#[derive(Clone)]
pub struct EventBus {
    state: Rc<BusState>,
}

/// Builder for [`EventBus`]
pub struct EventBusBuilder {
    config: BusConfig,
    clock: Box<dyn Clock>,
    diagnostics: Rc<dyn Diagnostics>,
}

impl EventBusBuilder {
    pub fn config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Rc::new(diagnostics);
        self
    }

    pub fn build(self) -> EventBus {
        let mut config = self.config;
        config.max_depth = config.max_depth.max(1);

        EventBus {
            state: Rc::new(BusState {
                registry: RefCell::new(Registry::new()),
                sequence: Cell::new(0),
                depth: Cell::new(0),
                aborted: Cell::new(None),
                observer: RefCell::new(None),
                diagnostics: self.diagnostics,
                clock: self.clock,
                config,
            }),
        }
    }
}

impl Default for EventBusBuilder {
    fn default() -> Self {
        Self {
            config: BusConfig::default(),
            clock: Box::new(SystemClock),
            diagnostics: Rc::new(TracingDiagnostics),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::default()
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &BusConfig {
        &self.state.config
    }

    // -- Subscribing --

    /// Register `listener` at the end of `kind`'s list
    pub fn subscribe<F>(
        &self,
        kind: EventKind,
        listener: F,
        options: SubscribeOptions,
    ) -> Subscription
    where
        F: Fn(&Envelope, &EventBus) -> ListenerResult + 'static,
    {
        self.insert(kind, Rc::new(listener), options)
    }

    /// Subscribe by wire name; names outside the catalog are rejected
    pub fn subscribe_named<F>(
        &self,
        name: &str,
        listener: F,
        options: SubscribeOptions,
    ) -> Result<Subscription, BusError>
    where
        F: Fn(&Envelope, &EventBus) -> ListenerResult + 'static,
    {
        let kind: EventKind = name.parse()?;
        Ok(self.subscribe(kind, listener, options))
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: Fn(&Envelope, &EventBus) -> ListenerResult + 'static,
    {
        self.subscribe(kind, listener, SubscribeOptions::default())
    }

    /// Subscribe for a single invocation
    pub fn once<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: Fn(&Envelope, &EventBus) -> ListenerResult + 'static,
    {
        self.subscribe(kind, listener, SubscribeOptions::once())
    }

    /// Subscribe to `P::KIND`, receiving the payload already typed
    pub fn on_payload<P, F>(&self, listener: F) -> Subscription
    where
        P: Payload,
        F: Fn(&P, &EventBus) -> ListenerResult + 'static,
    {
        self.subscribe(P::KIND, typed::<P, F>(listener), SubscribeOptions::default())
    }

    pub fn once_payload<P, F>(&self, listener: F) -> Subscription
    where
        P: Payload,
        F: Fn(&P, &EventBus) -> ListenerResult + 'static,
    {
        self.subscribe(P::KIND, typed::<P, F>(listener), SubscribeOptions::once())
    }

    /// Subscribe one listener to every kind `pattern` selects
    ///
    /// Each selected kind gets its own subscription; with `once`, each of
    /// them fires at most once. A pattern selecting nothing is an error.
    pub fn subscribe_pattern<F>(
        &self,
        pattern: &EventPattern,
        listener: F,
        options: SubscribeOptions,
    ) -> Result<Vec<Subscription>, BusError>
    where
        F: Fn(&Envelope, &EventBus) -> ListenerResult + 'static,
    {
        let kinds = pattern.kinds();
        if kinds.is_empty() {
            return Err(BusError::UnknownEventKind {
                name: pattern.to_string(),
            });
        }

        let listener: Listener = Rc::new(listener);
        Ok(kinds
            .into_iter()
            .map(|kind| self.insert(kind, Rc::clone(&listener), options.clone()))
            .collect())
    }

    fn insert(
        &self,
        kind: EventKind,
        listener: Listener,
        options: SubscribeOptions,
    ) -> Subscription {
        let subscription = self
            .state
            .registry
            .borrow_mut()
            .insert(kind, listener, options);
        tracing::trace!(kind = %kind, subscription = %subscription.id(), "subscribed");
        subscription
    }

    // -- Removing --

    /// Remove a subscription; returns false if it was already gone or
    /// belongs to another bus
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut registry = self.state.registry.borrow_mut();
        if !registry.owns(subscription) {
            tracing::debug!(subscription = %subscription.id(), "handle from another bus");
            return false;
        }
        registry.remove(subscription.kind(), subscription.id())
    }

    /// Remove every subscription of `kind`, returning how many there were
    pub fn clear(&self, kind: EventKind) -> usize {
        self.state.registry.borrow_mut().clear(kind)
    }

    pub fn clear_all(&self) -> usize {
        self.state.registry.borrow_mut().clear_all()
    }

    // -- Emitting --

    pub fn emit<P: Payload>(&self, payload: P) -> Result<Delivery, BusError> {
        self.emit_event(payload.into_event())
    }

    /// Emit from a wire name and JSON payload
    ///
    /// Parsing happens before anything else, so a bad name or payload
    /// leaves the bus untouched and consumes no sequence number.
    pub fn emit_named(&self, name: &str, payload: Value) -> Result<Delivery, BusError> {
        let event = GameEvent::from_wire(name, payload)?;
        self.emit_event(event)
    }

    /// Deliver `event` to every listener of its kind
    ///
    /// Listener failures are reported to the bus's diagnostics and never
    /// returned. The only error is [`BusError::ReentrantEmissionLimit`],
    /// which ends every dispatch in the current emit chain.
    pub fn emit_event(&self, event: GameEvent) -> Result<Delivery, BusError> {
        let state = &*self.state;
        let kind = event.kind();
        let limit = state.config.max_depth;

        let depth = state.depth.get() + 1;
        if depth > limit {
            tracing::error!(kind = %kind, depth, limit, "re-entrant emission limit reached");
            state.aborted.set(Some(Abort { kind, depth }));
            return Err(BusError::ReentrantEmissionLimit { kind, depth, limit });
        }
        let _guard = DepthGuard::enter(state);

        let sequence = state.sequence.get() + 1;
        state.sequence.set(sequence);
        let envelope = Envelope::new(event, sequence, state.clock.now());

        if state.config.trace_emissions {
            tracing::debug!(kind = %kind, sequence, depth, "emit");
        }

        let observer = state.observer.borrow().clone();
        if let Some(observer) = observer {
            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| observer(&envelope))) {
                tracing::error!(
                    kind = %kind,
                    sequence,
                    error = %panic_message(&*panic),
                    "observer failed"
                );
            }
            if let Some(abort) = state.aborted.get() {
                return Err(abort.error(limit));
            }
        }

        let slots = state.registry.borrow().snapshot(kind);
        let mut delivery = Delivery {
            kind,
            sequence,
            delivered: 0,
            failed: 0,
        };

        for slot in slots {
            if !slot.is_active() {
                continue;
            }
            if slot.once {
                state.registry.borrow_mut().remove(kind, slot.id);
            }

            let listener = slot.listener();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(&envelope, self)));

            if let Some(abort) = state.aborted.get() {
                return Err(abort.error(limit));
            }

            let message = match outcome {
                Ok(Ok(())) => {
                    delivery.delivered += 1;
                    continue;
                }
                Ok(Err(failure)) => failure.message().to_string(),
                Err(panic) => panic_message(&*panic),
            };

            delivery.failed += 1;
            state.diagnostics.listener_failed(&ListenerError {
                kind,
                subscription: slot.id,
                label: slot.label.clone(),
                sequence,
                message,
            });
        }

        Ok(delivery)
    }

    // -- Observer --

    /// Install the bus-wide observer, replacing any previous one
    ///
    /// The observer sees every envelope before the listeners do. It is not
    /// a subscription and doesn't show up in the counts below.
    pub fn set_observer<F>(&self, observer: F)
    where
        F: Fn(&Envelope) + 'static,
    {
        *self.state.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn clear_observer(&self) {
        *self.state.observer.borrow_mut() = None;
    }

    pub fn has_observer(&self) -> bool {
        self.state.observer.borrow().is_some()
    }

    // -- Introspection --

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state.registry.borrow().len(kind)
    }

    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listener_count(kind) > 0
    }

    /// Total subscriptions across all kinds
    pub fn subscription_count(&self) -> usize {
        self.state.registry.borrow().total()
    }

    /// Kinds with at least one listener, in catalog order
    pub fn active_kinds(&self) -> Vec<EventKind> {
        self.state.registry.borrow().kinds()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.state.registry.borrow().subscriptions()
    }

    /// How many emissions are currently in flight
    pub fn depth(&self) -> usize {
        self.state.depth.get()
    }

    /// Sequence number of the most recent emission, 0 before the first
    pub fn last_sequence(&self) -> u64 {
        self.state.sequence.get()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .field("last_sequence", &self.last_sequence())
            .field("depth", &self.depth())
            .field("config", &self.state.config)
            .finish()
    }
}

/// Tracks emit nesting; unwinds correctly even if a listener panics
struct DepthGuard<'a> {
    state: &'a BusState,
}

impl<'a> DepthGuard<'a> {
    fn enter(state: &'a BusState) -> Self {
        state.depth.set(state.depth.get() + 1);
        Self { state }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.state.depth.get().saturating_sub(1);
        self.state.depth.set(depth);
        // The outermost emit has returned; the chain is over
        if depth == 0 {
            self.state.aborted.set(None);
        }
    }
}

fn typed<P, F>(listener: F) -> impl Fn(&Envelope, &EventBus) -> ListenerResult + 'static
where
    P: Payload,
    F: Fn(&P, &EventBus) -> ListenerResult + 'static,
{
    move |envelope: &Envelope, bus: &EventBus| match envelope.payload::<P>() {
        Some(payload) => listener(payload, bus),
        None => Err(ListenerFailure::new(format!(
            "expected {} payload, got {}",
            P::KIND,
            envelope.kind()
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
