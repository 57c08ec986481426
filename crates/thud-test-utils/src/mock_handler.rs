// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event handlers that record, fail, or panic on demand.

use std::sync::{Arc, Mutex};

use thud_core::{EventData, EventHandler, ThudError};

/// Shared, ordered record of handler invocations.
///
/// Each entry is `"<tag>:<event>"`.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.into());
        }
    }

    /// Entries recorded so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Just the tags, oldest first.
    pub fn tags(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|e| e.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Appends `"<tag>:<event>"` to its log on every call and succeeds.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    tag: String,
    log: CallLog,
}

impl RecordingHandler {
    pub fn new(tag: impl Into<String>, log: &CallLog) -> Self {
        Self {
            tag: tag.into(),
            log: log.clone(),
        }
    }
}

impl EventHandler for RecordingHandler {
    fn handle(&self, data: &EventData<'_>) -> Result<(), ThudError> {
        self.log.push(format!("{}:{}", self.tag, data.event()));
        Ok(())
    }
}

/// Always returns `ThudError::Handler` with the given message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl EventHandler for FailingHandler {
    fn handle(&self, _data: &EventData<'_>) -> Result<(), ThudError> {
        Err(ThudError::Handler(self.message.clone()))
    }
}

/// Always panics with the given message.
#[derive(Debug, Clone)]
pub struct PanickingHandler {
    message: String,
}

impl PanickingHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl EventHandler for PanickingHandler {
    fn handle(&self, _data: &EventData<'_>) -> Result<(), ThudError> {
        panic!("{}", self.message)
    }
}
