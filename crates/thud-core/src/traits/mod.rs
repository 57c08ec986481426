// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback traits a module implements for each role in the module contract.
//!
//! Closures with matching signatures implement [`Component`] and
//! [`EventHandler`] directly.

pub mod component;
pub mod handler;
pub mod lifecycle;

pub use component::Component;
pub use handler::EventHandler;
pub use lifecycle::{ModuleLifecycle, RegistryView};
