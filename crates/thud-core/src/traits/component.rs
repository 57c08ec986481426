// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-output component entry point.

use crate::types::Slot;

/// A named, invocable capability exposed by a module.
///
/// `buf.len()` is the capacity. Implementations write at most that many bytes,
/// add no terminator they do not count themselves, and return the number of
/// bytes the full output needs, which may exceed the capacity. A zero-length
/// buffer asks for the required size only.
pub trait Component: Send + Sync {
    fn invoke(&self, slot: Slot, format: &str, buf: &mut [u8]) -> usize;
}

impl<F> Component for F
where
    F: Fn(Slot, &str, &mut [u8]) -> usize + Send + Sync,
{
    fn invoke(&self, slot: Slot, format: &str, buf: &mut [u8]) -> usize {
        self(slot, format, buf)
    }
}

/// Copies as much of `bytes` as fits into `buf` and returns the full length.
///
/// Helper for components whose output is computed up front.
pub fn write_truncated(bytes: &[u8], buf: &mut [u8]) -> usize {
    let n = bytes.len().min(buf.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    bytes.len()
}
