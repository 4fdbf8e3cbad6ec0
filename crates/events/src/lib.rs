// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Flip7 game events
//!
//! A closed catalog of everything the game can announce, and a synchronous
//! in-process bus that delivers those announcements to the rules engine,
//! the AI, the UI and mobile sync without them knowing about each other.
//!
//! ```
//! use flip7_events::payload::{PlayerHit, PlayerId};
//! use flip7_events::{EventBus, EventKind};
//!
//! let bus = EventBus::new();
//! bus.on_payload::<PlayerHit, _>(|hit, _| {
//!     println!("{} hits", hit.player_id);
//!     Ok(())
//! });
//!
//! let delivery = bus.emit(PlayerHit { player_id: PlayerId(3) })?;
//! assert_eq!(delivery.kind, EventKind::PlayerHit);
//! assert_eq!(delivery.delivered, 1);
//! # Ok::<(), flip7_events::BusError>(())
//! ```

mod bus;
mod catalog;
mod clock;
mod config;
mod diagnostics;
mod envelope;
mod error;
mod event;
mod journal;
mod pattern;
pub mod payload;
mod registry;
pub mod telemetry;

pub use bus::{Delivery, EventBus, EventBusBuilder};
pub use catalog::{Catalog, CatalogChange, EventGroup, EventKind, GameEvent};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BusConfig, ConfigError};
pub use diagnostics::{CollectingDiagnostics, Diagnostics, TracingDiagnostics};
pub use envelope::Envelope;
pub use error::{BusError, ListenerError, ListenerFailure, ListenerResult};
pub use event::Payload;
pub use journal::{EventJournal, JournalError, JournalRecord};
pub use pattern::EventPattern;
pub use registry::{SubscribeOptions, Subscription, SubscriptionId};
