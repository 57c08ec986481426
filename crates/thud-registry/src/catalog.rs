// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in module catalog.
//!
//! Modules compiled into the host binary. The only entry today is `core`.

use thud_core::traits::component::write_truncated;
use thud_core::{EventData, ModuleDescriptor, Slot, ThudError};

use crate::manifest::ModuleManifest;

/// Name of the built-in module every host starts with.
pub const CORE_MODULE: &str = "core";

/// Returns descriptors for all built-in modules.
///
/// `core` provides:
/// - `echo`: writes the format string back, truncated to capacity
/// - `version`: writes the host version
/// - a `startup` handler that logs the event
pub fn builtin_modules() -> Vec<ModuleDescriptor> {
    vec![
        ModuleDescriptor::new(CORE_MODULE, crate::HOST_VERSION)
            .with_component("echo", echo)
            .with_component("version", version)
            .with_handler("startup", startup),
    ]
}

/// Manifests describing the built-in modules, for resolving alongside on-disk ones.
pub fn builtin_manifests() -> Vec<ModuleManifest> {
    builtin_modules()
        .iter()
        .map(|m| ModuleManifest {
            name: m.name.clone(),
            version: m.version.clone(),
            description: "Built-in components of the Thud host".to_string(),
            deps: m.deps.clone(),
            components: m.component_names().map(str::to_string).collect(),
            events: m.handlers.iter().map(|h| h.event.clone()).collect(),
            min_thud_version: None,
        })
        .collect()
}

fn echo(_slot: Slot, format: &str, buf: &mut [u8]) -> usize {
    write_truncated(format.as_bytes(), buf)
}

fn version(_slot: Slot, _format: &str, buf: &mut [u8]) -> usize {
    write_truncated(crate::HOST_VERSION.as_bytes(), buf)
}

fn startup(data: &EventData<'_>) -> Result<(), ThudError> {
    match data.downcast::<String>() {
        Some(text) => tracing::info!(event = data.event(), data = %text, "core received event"),
        None => tracing::info!(event = data.event(), "core received event"),
    }
    Ok(())
}
