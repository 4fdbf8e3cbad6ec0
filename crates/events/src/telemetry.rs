// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing` subscriber setup for hosts embedding the bus

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter used when `RUST_LOG` is unset and the host has no preference
pub const DEFAULT_FILTER: &str = "info";

/// Install a stderr subscriber
///
/// `RUST_LOG` wins over `default_filter` when set; pass
/// [`DEFAULT_FILTER`] for the usual `info` level.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Route logs through the test harness's captured output
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_writer() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flip7_events=debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
