// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thud list` command implementation.

use std::io::Write;

use serde::Serialize;
use thud_core::ThudError;
use thud_registry::Host;

use crate::output_error;

/// One module in `list --json` output.
#[derive(Debug, Serialize)]
pub struct ModuleView {
    pub name: String,
    pub version: String,
    pub deps: Vec<String>,
    pub components: Vec<String>,
    pub events: Vec<String>,
}

/// Structured output for `list --json`.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub component_scope: String,
    pub modules: Vec<ModuleView>,
}

fn collect(host: &Host) -> ListOutput {
    let registry = host.snapshot();
    ListOutput {
        component_scope: registry.policy().component_scope.to_string(),
        modules: registry
            .modules()
            .iter()
            .map(|m| ModuleView {
                name: m.name.clone(),
                version: m.version.clone(),
                deps: m.deps.clone(),
                components: m.components.clone(),
                events: m.events.clone(),
            })
            .collect(),
    }
}

/// Run `thud list`.
pub fn run_list(host: &Host, json: bool, out: &mut impl Write) -> Result<(), ThudError> {
    let listing = collect(host);

    if json {
        let text = serde_json::to_string_pretty(&listing)
            .map_err(|e| ThudError::Internal(format!("failed to encode JSON: {e}")))?;
        writeln!(out, "{text}").map_err(output_error)?;
        return Ok(());
    }

    if listing.modules.is_empty() {
        writeln!(out, "no modules loaded").map_err(output_error)?;
        return Ok(());
    }
    for module in &listing.modules {
        writeln!(out, "{} {}", module.name, module.version).map_err(output_error)?;
        if !module.deps.is_empty() {
            writeln!(out, "  deps:       {}", module.deps.join(", ")).map_err(output_error)?;
        }
        if !module.components.is_empty() {
            writeln!(out, "  components: {}", module.components.join(", ")).map_err(output_error)?;
        }
        if !module.events.is_empty() {
            writeln!(out, "  handlers:   {}", module.events.join(", ")).map_err(output_error)?;
        }
    }
    Ok(())
}
