// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Thud module host.
//!
//! This crate provides the module contract shared by the host and by modules:
//! the callback traits, module descriptors with their validation rules, the
//! error type, and the borrowed event payload wrapper.

pub mod descriptor;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use descriptor::{ComponentRecord, HandlerRecord, ModuleDescriptor};
pub use error::{HandlerFailure, ThudError};
pub use traits::{Component, EventHandler, ModuleLifecycle, RegistryView};
pub use types::{ComponentScope, EventData, Slot};
