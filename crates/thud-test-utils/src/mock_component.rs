// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Components with predictable output for testing.

use std::sync::{Arc, Mutex};

use thud_core::traits::component::write_truncated;
use thud_core::{Component, Slot};

/// Writes the format string back, truncated to capacity, and returns its
/// full length.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoComponent;

impl Component for EchoComponent {
    fn invoke(&self, _slot: Slot, format: &str, buf: &mut [u8]) -> usize {
        write_truncated(format.as_bytes(), buf)
    }
}

/// One observed component call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCall {
    pub slot: Slot,
    pub format: String,
    pub capacity: usize,
}

/// Returns fixed output and records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct CountingComponent {
    output: Vec<u8>,
    calls: Arc<Mutex<Vec<ComponentCall>>>,
}

impl CountingComponent {
    pub fn new(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls observed so far, oldest first. Clones share the same record.
    pub fn calls(&self) -> Vec<ComponentCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Component for CountingComponent {
    fn invoke(&self, slot: Slot, format: &str, buf: &mut [u8]) -> usize {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ComponentCall {
                slot,
                format: format.to_string(),
                capacity: buf.len(),
            });
        }
        write_truncated(&self.output, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_truncates() {
        let mut buf = [0u8; 3];
        assert_eq!(EchoComponent.invoke(0, "0123456789", &mut buf), 10);
        assert_eq!(&buf, b"012");
    }

    #[test]
    fn counting_component_shares_calls_between_clones() {
        let component = CountingComponent::new("ok");
        let handle = component.clone();
        let mut buf = [0u8; 8];
        assert_eq!(component.invoke(7, "fmt", &mut buf), 2);
        assert_eq!(
            handle.calls(),
            vec![ComponentCall {
                slot: 7,
                format: "fmt".to_string(),
                capacity: 8
            }]
        );
    }
}
