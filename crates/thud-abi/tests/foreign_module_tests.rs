// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading C-layout modules into a host.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use thud_abi::{EventHandler, ModInfo, RawPayload, ThudComponent, descriptors_from_raw};
use thud_core::ThudError;
use thud_registry::Host;

unsafe extern "C" fn echo(_slot: u8, fmt: *const c_char, buf: *mut c_char, size: usize) -> usize {
    // SAFETY: the host passes a valid C string.
    let text = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    if !buf.is_null() {
        // SAFETY: `buf` is valid for `size` bytes.
        unsafe {
            ptr::copy_nonoverlapping(text.as_ptr().cast::<c_char>(), buf, text.len().min(size));
        }
    }
    text.len()
}

static STARTUPS: AtomicUsize = AtomicUsize::new(0);

unsafe extern "C" fn on_startup(data: *mut c_void) {
    // SAFETY: this test publishes a pointer to a live usize.
    let step = unsafe { *data.cast::<usize>() };
    STARTUPS.fetch_add(step, Ordering::SeqCst);
}

#[test]
fn c_modules_load_in_dependency_order_and_run() {
    let a_components = [
        ThudComponent {
            name: c"echo".as_ptr(),
            cbk: Some(echo),
        },
        ThudComponent::SENTINEL,
    ];
    let b_deps = [c"A".as_ptr(), ptr::null()];
    let b_handlers = [
        EventHandler {
            event: c"startup".as_ptr(),
            cbk: Some(on_startup),
        },
        EventHandler::SENTINEL,
    ];
    let b = ModInfo {
        name: c"B".as_ptr(),
        version: c"0.1".as_ptr(),
        deps: b_deps.as_ptr(),
        thud_components: ptr::null(),
        event_handlers: b_handlers.as_ptr(),
    };
    let a = ModInfo {
        name: c"A".as_ptr(),
        version: c"0.1".as_ptr(),
        deps: ptr::null(),
        thud_components: a_components.as_ptr(),
        event_handlers: ptr::null(),
    };

    // SAFETY: all arrays are terminated and outlive the host.
    let descriptors =
        unsafe { descriptors_from_raw(&[ptr::from_ref(&b), ptr::from_ref(&a)]) }.unwrap();
    let host = Host::default();
    assert_eq!(host.load(descriptors).unwrap().order, vec!["A", "B"]);

    let mut buf = [0u8; 3];
    assert_eq!(host.invoke("echo", 0, "0123456789", &mut buf).unwrap(), 10);
    assert_eq!(&buf, b"012");

    let mut step: usize = 4;
    let payload = RawPayload((&mut step as *mut usize).cast());
    assert_eq!(host.publish("startup", &payload).unwrap(), 1);
    assert_eq!(STARTUPS.load(Ordering::SeqCst), 4);
}

#[test]
fn foreign_self_dependency_fails_validation() {
    let deps = [c"loop".as_ptr(), ptr::null()];
    let info = ModInfo {
        name: c"loop".as_ptr(),
        version: c"1".as_ptr(),
        deps: deps.as_ptr(),
        thud_components: ptr::null(),
        event_handlers: ptr::null(),
    };
    // SAFETY: the dependency array is terminated.
    let descriptors = unsafe { descriptors_from_raw(&[ptr::from_ref(&info)]) }.unwrap();
    let host = Host::default();
    assert!(matches!(host.load(descriptors).unwrap_err(), ThudError::InvalidModule { .. }));
}
