// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! C layout of Thud module descriptors.
//!
//! Modules built against the C header describe themselves with a `mod_info`
//! struct holding sentinel-terminated arrays of raw callbacks. This crate
//! mirrors that layout and imports it into an owned
//! [`ModuleDescriptor`](thud_core::ModuleDescriptor) whose callbacks are
//! wrapped in the safe module traits.

pub mod adapter;
pub mod import;
pub mod layout;

pub use adapter::{ForeignComponent, ForeignHandler, RawPayload};
pub use import::{descriptor_from_raw, descriptors_from_raw};
pub use layout::{EventHandler, ModInfo, ThudComponent};
