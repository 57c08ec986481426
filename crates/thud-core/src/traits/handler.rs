// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event subscription entry point.

use crate::error::ThudError;
use crate::types::EventData;

/// Callback bound to a named event.
///
/// The payload is borrowed for the duration of the call only. A returned
/// error is collected by the dispatcher and never stops the remaining
/// handlers of the same round.
pub trait EventHandler: Send + Sync {
    fn handle(&self, data: &EventData<'_>) -> Result<(), ThudError>;
}

impl<F> EventHandler for F
where
    F: Fn(&EventData<'_>) -> Result<(), ThudError> + Send + Sync,
{
    fn handle(&self, data: &EventData<'_>) -> Result<(), ThudError> {
        self(data)
    }
}
