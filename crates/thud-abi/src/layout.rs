// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `#[repr(C)]` mirrors of the module header.
//!
//! Field order and types match the C declarations exactly. Component and
//! handler arrays end at the first entry whose callback is null and whose
//! name is null or the empty string.

use std::ffi::{c_char, c_void};

/// Whether `ptr` is null or points at an empty C string.
///
/// # Safety
///
/// `ptr` must be null or point to a readable byte.
unsafe fn is_null_or_empty(ptr: *const c_char) -> bool {
    // SAFETY: non-null pointers are readable per the caller.
    ptr.is_null() || unsafe { *ptr } == 0
}

/// Raw component entry point: `(slot, fmt, buf, size) -> size_t`.
pub type RawComponentFn = unsafe extern "C" fn(u8, *const c_char, *mut c_char, usize) -> usize;

/// Raw event handler entry point: `(data) -> void`.
pub type RawHandlerFn = unsafe extern "C" fn(*mut c_void);

/// `struct thud_component`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ThudComponent {
    pub name: *const c_char,
    pub cbk: Option<RawComponentFn>,
}

impl ThudComponent {
    /// The `{ NULL, NULL }` terminator.
    pub const SENTINEL: Self = Self {
        name: std::ptr::null(),
        cbk: None,
    };

    /// Whether this entry terminates its array.
    ///
    /// # Safety
    ///
    /// `name` must be null or point to a NUL-terminated string.
    pub unsafe fn is_sentinel(&self) -> bool {
        // SAFETY: forwarded to the caller.
        self.cbk.is_none() && unsafe { is_null_or_empty(self.name) }
    }
}

/// `struct event_handler`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    pub event: *const c_char,
    pub cbk: Option<RawHandlerFn>,
}

impl EventHandler {
    /// The `{ NULL, NULL }` terminator.
    pub const SENTINEL: Self = Self {
        event: std::ptr::null(),
        cbk: None,
    };

    /// Whether this entry terminates its array.
    ///
    /// # Safety
    ///
    /// `event` must be null or point to a NUL-terminated string.
    pub unsafe fn is_sentinel(&self) -> bool {
        // SAFETY: forwarded to the caller.
        self.cbk.is_none() && unsafe { is_null_or_empty(self.event) }
    }
}

/// `struct mod_info`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ModInfo {
    pub name: *const c_char,
    pub version: *const c_char,
    /// NULL-terminated; a null pointer means no dependencies.
    pub deps: *const *const c_char,
    pub thud_components: *const ThudComponent,
    pub event_handlers: *const EventHandler,
}
