// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for envelope timestamps

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of envelope timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests
///
/// Clones share one instant, so a test can keep a handle after giving the
/// clock to a bus and move time forward between emissions.
#[derive(Debug, Clone)]
pub struct FakeClock {
    instant: Rc<Cell<DateTime<Utc>>>,
}

impl FakeClock {
    /// Start at the current wall-clock time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Rc::new(Cell::new(instant)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.instant.set(self.instant.get() + by);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(instant);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.get()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
