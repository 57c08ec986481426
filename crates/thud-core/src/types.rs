// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, loader, and ABI boundary.

use std::any::Any;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ThudError;

/// Selector passed verbatim to component callbacks. The host never interprets it.
pub type Slot = u8;

/// Separator between module and component name in a qualified component name.
pub const QUALIFIED_SEPARATOR: char = '/';

/// How component names are scoped inside the registry.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComponentScope {
    /// Component names are unique across every registered module.
    #[default]
    Global,
    /// Component names are unique per module; lookups may be qualified as `module/name`.
    Module,
}

/// Borrowed event payload handed to every handler of one publish round.
///
/// The event name is the only discriminator for the payload's concrete type,
/// so handlers downcast to the type agreed on for that event.
#[derive(Clone, Copy)]
pub struct EventData<'a> {
    event: &'a str,
    payload: &'a dyn Any,
}

impl<'a> EventData<'a> {
    pub fn new(event: &'a str, payload: &'a dyn Any) -> Self {
        Self { event, payload }
    }

    /// Name of the event being published.
    pub fn event(&self) -> &'a str {
        self.event
    }

    /// Raw payload reference.
    pub fn payload(&self) -> &'a dyn Any {
        self.payload
    }

    /// Returns the payload as `T` if that is its concrete type.
    pub fn downcast<T: Any>(&self) -> Option<&'a T> {
        self.payload.downcast_ref::<T>()
    }

    /// Like [`downcast`](Self::downcast), but reports a `PayloadMismatch` on failure.
    pub fn expect<T: Any>(&self) -> Result<&'a T, ThudError> {
        self.downcast::<T>().ok_or_else(|| ThudError::PayloadMismatch {
            event: self.event.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl std::fmt::Debug for EventData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventData")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Splits `module/name` into its parts. Bare names return `None`.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let (module, component) = name.split_once(QUALIFIED_SEPARATOR)?;
    if module.is_empty() || component.is_empty() {
        return None;
    }
    Some((module, component))
}
