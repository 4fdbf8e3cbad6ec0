// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration
//!
//! ```toml
//! max_depth = 16
//! trace_emissions = true
//! journal_path = "logs/events.jsonl"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,
}

/// Tunables for an [`EventBus`](crate::EventBus)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// How deep listeners may nest `emit` calls
    pub max_depth: usize,
    /// Log every emission at `debug` level
    pub trace_emissions: bool,
    /// Append every envelope to this JSON-lines file
    pub journal_path: Option<PathBuf>,
}

impl BusConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// Shallow limits and tracing on, for tests
    pub fn for_testing() -> Self {
        Self {
            max_depth: 4,
            trace_emissions: true,
            journal_path: None,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BusConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        // Relative journal paths are relative to the config file
        if let (Some(journal), Some(dir)) = (&config.journal_path, path.parent()) {
            if journal.is_relative() {
                config.journal_path = Some(dir.join(journal));
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            trace_emissions: false,
            journal_path: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
