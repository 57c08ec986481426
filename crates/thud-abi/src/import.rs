// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of a raw `ModInfo` into a [`ModuleDescriptor`].
//!
//! Sentinel-terminated arrays are read up to, never past, their terminator.
//! Every string is copied, so the descriptor owns its names; only the
//! callbacks keep pointing into the module.

use std::ffi::{CStr, c_char};

use thud_core::{ModuleDescriptor, ThudError};

use crate::adapter::{ForeignComponent, ForeignHandler};
use crate::layout::{EventHandler, ModInfo, ThudComponent};

/// Upper bound on entries read from one array before giving up on finding
/// its terminator.
pub const MAX_ENTRIES: usize = 4096;

/// Build a descriptor from a raw module descriptor.
///
/// Fails with [`ThudError::Abi`] on null or non-UTF-8 strings, entries with
/// exactly one null field, and unterminated arrays. The result still goes
/// through normal descriptor validation when it is registered.
///
/// # Safety
///
/// `info` must point to a valid `ModInfo` whose strings are NUL-terminated
/// and whose arrays are null or sentinel-terminated. Every callback must
/// satisfy the contracts of [`ForeignComponent::new`] and
/// [`ForeignHandler::new`] for as long as the module stays registered.
pub unsafe fn descriptor_from_raw(info: *const ModInfo) -> Result<ModuleDescriptor, ThudError> {
    // SAFETY: caller guarantees `info` is null or valid.
    let Some(info) = (unsafe { info.as_ref() }) else {
        return Err(ThudError::Abi("module descriptor pointer is null".to_string()));
    };

    // SAFETY: caller guarantees valid strings and arrays.
    let name = unsafe { read_str(info.name, "module name") }.map_err(ThudError::Abi)?;
    let version = unsafe { read_str(info.version, "module version") }
        .map_err(|e| in_module(&name, e))?;

    let mut descriptor = ModuleDescriptor::new(name.clone(), version);

    // SAFETY: caller guarantees `deps` is null or NULL-terminated.
    let deps =
        unsafe { read_terminated(info.deps, |p| p.is_null()) }.map_err(|e| in_module(&name, e))?;
    for dep in deps {
        // SAFETY: non-terminator entries are valid C strings.
        let dep = unsafe { read_str(*dep, "dependency name") }.map_err(|e| in_module(&name, e))?;
        descriptor = descriptor.with_dependency(dep);
    }

    // SAFETY: caller guarantees the array is null or sentinel-terminated.
    let components = unsafe {
        read_terminated(info.thud_components, |c: &ThudComponent| c.is_sentinel())
    }
    .map_err(|e| in_module(&name, e))?;
    for (index, entry) in components.iter().enumerate() {
        let Some(cbk) = entry.cbk else {
            return Err(in_module(&name, format!("component #{index} has a name but no callback")));
        };
        // SAFETY: non-sentinel entries carry valid strings.
        let component = unsafe { read_str(entry.name, "component name") }
            .map_err(|e| in_module(&name, format!("component #{index}: {e}")))?;
        // SAFETY: caller guarantees the callback contract.
        descriptor = descriptor.with_component(component, unsafe { ForeignComponent::new(cbk) });
    }

    // SAFETY: caller guarantees the array is null or sentinel-terminated.
    let handlers = unsafe {
        read_terminated(info.event_handlers, |h: &EventHandler| h.is_sentinel())
    }
    .map_err(|e| in_module(&name, e))?;
    for (index, entry) in handlers.iter().enumerate() {
        let Some(cbk) = entry.cbk else {
            return Err(in_module(&name, format!("handler #{index} has an event but no callback")));
        };
        // SAFETY: non-sentinel entries carry valid strings.
        let event = unsafe { read_str(entry.event, "event name") }
            .map_err(|e| in_module(&name, format!("handler #{index}: {e}")))?;
        // SAFETY: caller guarantees the callback contract.
        descriptor = descriptor.with_handler(event, unsafe { ForeignHandler::new(cbk) });
    }

    tracing::debug!(
        module = %descriptor.name,
        deps = descriptor.deps.len(),
        components = descriptor.components.len(),
        handlers = descriptor.handlers.len(),
        "imported raw module descriptor"
    );
    Ok(descriptor)
}

/// Import several raw descriptors, stopping at the first malformed one.
///
/// # Safety
///
/// Every pointer must satisfy the requirements of [`descriptor_from_raw`].
pub unsafe fn descriptors_from_raw(
    infos: &[*const ModInfo],
) -> Result<Vec<ModuleDescriptor>, ThudError> {
    infos
        .iter()
        // SAFETY: forwarded to the caller.
        .map(|&info| unsafe { descriptor_from_raw(info) })
        .collect()
}

fn in_module(module: &str, message: impl std::fmt::Display) -> ThudError {
    ThudError::Abi(format!("module `{module}`: {message}"))
}

/// Copy a NUL-terminated UTF-8 string.
unsafe fn read_str(ptr: *const c_char, what: &str) -> Result<String, String> {
    if ptr.is_null() {
        return Err(format!("{what} is null"));
    }
    // SAFETY: non-null and NUL-terminated per the caller.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str()
        .map(str::to_string)
        .map_err(|e| format!("{what} is not valid UTF-8: {e}"))
}

/// Entries of a terminated array, excluding the terminator.
///
/// A null array pointer is an empty array.
unsafe fn read_terminated<'a, T>(
    ptr: *const T,
    is_end: impl Fn(&T) -> bool,
) -> Result<&'a [T], String> {
    if ptr.is_null() {
        return Ok(&[]);
    }
    let mut len = 0;
    loop {
        if len == MAX_ENTRIES {
            return Err(format!("array is not terminated within {MAX_ENTRIES} entries"));
        }
        // SAFETY: entries up to and including the terminator are readable.
        let entry = unsafe { &*ptr.add(len) };
        if is_end(entry) {
            break;
        }
        len += 1;
    }
    // SAFETY: the first `len` entries were just read.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}
