// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit trail of emitted events
//!
//! One JSON object per line. Once attached, the journal records every
//! envelope the bus emits, before any listener sees it.

use crate::bus::EventBus;
use crate::catalog::{EventKind, GameEvent};
use crate::config::BusConfig;
use crate::envelope::Envelope;
use crate::pattern::EventPattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Errors from reading or writing a journal
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode journal record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("corrupt journal record at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A journaled emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Bus sequence number of the emission
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub event: GameEvent,
}

impl From<&Envelope> for JournalRecord {
    fn from(envelope: &Envelope) -> Self {
        Self {
            sequence: envelope.sequence(),
            timestamp: envelope.timestamp(),
            kind: envelope.kind(),
            event: envelope.event().clone(),
        }
    }
}

/// JSON-lines event journal
#[derive(Debug)]
pub struct EventJournal {
    path: PathBuf,
    records: usize,
}

impl EventJournal {
    /// Open or create a journal at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JournalError> {
        let path = path.into();

        // Count existing records so len() covers earlier sessions
        let records = if path.exists() {
            let file = File::open(&path)?;
            let mut count = 0;
            for line in BufReader::new(file).lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
            count
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            0
        };

        Ok(Self { path, records })
    }

    /// Open the journal named by `config`, if any
    pub fn from_config(config: &BusConfig) -> Result<Option<Self>, JournalError> {
        config.journal_path.as_ref().map(Self::open).transpose()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one envelope
    pub fn append(&mut self, envelope: &Envelope) -> Result<JournalRecord, JournalError> {
        let record = JournalRecord::from(envelope);
        let json = serde_json::to_string(&record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{json}")?;

        self.records += 1;
        Ok(record)
    }

    /// Read every record, oldest first
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, JournalError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let file = File::open(&self.path)?;
        let mut records = Vec::new();

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record =
                serde_json::from_str(&line).map_err(|source| JournalError::Corrupt {
                    path: self.path.clone(),
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Records whose kind matches `pattern`
    pub fn query(&self, pattern: &EventPattern) -> Result<Vec<JournalRecord>, JournalError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| pattern.matches(r.kind))
            .collect())
    }

    /// Records emitted after `sequence`
    pub fn after(&self, sequence: u64) -> Result<Vec<JournalRecord>, JournalError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.sequence > sequence)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Record every emission of `bus` from now on
    ///
    /// Installs the journal as the bus observer. Write failures are logged
    /// and dropped; dispatch carries on regardless.
    pub fn attach(self, bus: &EventBus) -> Rc<RefCell<EventJournal>> {
        let journal = Rc::new(RefCell::new(self));
        let sink = Rc::clone(&journal);

        bus.set_observer(move |envelope| {
            let Ok(mut journal) = sink.try_borrow_mut() else {
                tracing::error!(
                    kind = %envelope.kind(),
                    sequence = envelope.sequence(),
                    "journal busy, record dropped"
                );
                return;
            };
            if let Err(e) = journal.append(envelope) {
                tracing::error!(
                    kind = %envelope.kind(),
                    sequence = envelope.sequence(),
                    path = %journal.path.display(),
                    error = %e,
                    "failed to append journal record"
                );
            }
        });

        journal
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
