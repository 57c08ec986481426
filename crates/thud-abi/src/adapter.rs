// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe trait implementations wrapping raw C callbacks.

use std::ffi::{CString, c_char, c_void};

use thud_core::{Component, EventData, EventHandler, Slot, ThudError};

use crate::layout::{RawComponentFn, RawHandlerFn};

/// Borrowed opaque pointer published to foreign handlers.
///
/// Publishing `&RawPayload(ptr)` hands `ptr` to each foreign handler as its
/// `void *data`. The pointee stays owned by the publisher.
#[derive(Debug, Clone, Copy)]
pub struct RawPayload(pub *mut c_void);

/// A foreign `cbk` exposed as a [`Component`].
#[derive(Debug, Clone, Copy)]
pub struct ForeignComponent {
    cbk: RawComponentFn,
}

impl ForeignComponent {
    /// # Safety
    ///
    /// `cbk` must honor the bounded-output contract (write at most `size`
    /// bytes to `buf`, accept a null `buf` when `size` is 0) and must stay
    /// callable for as long as the component is registered.
    pub unsafe fn new(cbk: RawComponentFn) -> Self {
        Self { cbk }
    }
}

impl Component for ForeignComponent {
    fn invoke(&self, slot: Slot, format: &str, buf: &mut [u8]) -> usize {
        let format = c_format(format);
        let out = if buf.is_empty() {
            std::ptr::null_mut()
        } else {
            buf.as_mut_ptr().cast::<c_char>()
        };
        // SAFETY: upheld by the caller of `ForeignComponent::new`; `out` is
        // valid for `buf.len()` bytes or null with a size of 0.
        unsafe { (self.cbk)(slot, format.as_ptr(), out, buf.len()) }
    }
}

/// A foreign `cbk` exposed as an [`EventHandler`].
#[derive(Debug, Clone, Copy)]
pub struct ForeignHandler {
    cbk: RawHandlerFn,
}

impl ForeignHandler {
    /// # Safety
    ///
    /// `cbk` must only borrow its `data` argument for the duration of the
    /// call, accept null, and stay callable while the handler is subscribed.
    pub unsafe fn new(cbk: RawHandlerFn) -> Self {
        Self { cbk }
    }
}

impl EventHandler for ForeignHandler {
    fn handle(&self, data: &EventData<'_>) -> Result<(), ThudError> {
        let ptr = if let Some(raw) = data.downcast::<RawPayload>() {
            raw.0
        } else if data.downcast::<()>().is_some() {
            std::ptr::null_mut()
        } else {
            return Err(ThudError::PayloadMismatch {
                event: data.event().to_string(),
                expected: std::any::type_name::<RawPayload>(),
            });
        };
        // SAFETY: upheld by the caller of `ForeignHandler::new`.
        unsafe { (self.cbk)(ptr) };
        Ok(())
    }
}

/// C copy of `format`, cut at the first interior NUL.
fn c_format(format: &str) -> CString {
    let bytes = format.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    CString::new(&bytes[..end]).unwrap_or_default()
}
