// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thud resolve` and `thud check` command implementations.
//!
//! Both read static manifests only; no module code runs. Built-in modules are
//! always part of the graph so manifests may depend on them.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thud_core::ThudError;
use thud_registry::manifest::ManifestScan;
use thud_registry::{ModuleManifest, builtin_manifests, resolve_manifests, scan_manifests};

use crate::output_error;

/// Structured output for `resolve --json`.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub dir: String,
    pub order: Vec<String>,
}

/// Built-in manifests followed by the ones found under `dir`, in discovery order.
fn scan_with_builtins(dir: &Path) -> Result<ManifestScan, ThudError> {
    let mut scan = scan_manifests(dir)?;
    let mut manifests: Vec<ModuleManifest> = builtin_manifests();
    manifests.append(&mut scan.manifests);
    scan.manifests = manifests;
    Ok(scan)
}

/// Run `thud resolve`: print the load order, one module per line.
pub fn run_resolve(
    dir: &Path,
    disabled: &[String],
    json: bool,
    out: &mut impl Write,
) -> Result<(), ThudError> {
    let scan = scan_with_builtins(dir)?;
    if let Some(first) = scan.errors.into_iter().next() {
        return Err(first);
    }
    let order = resolve_manifests(&scan.manifests, disabled)?;

    if json {
        let output = ResolveOutput {
            dir: dir.display().to_string(),
            order,
        };
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| ThudError::Internal(format!("failed to encode JSON: {e}")))?;
        writeln!(out, "{text}").map_err(output_error)?;
    } else {
        for (position, name) in order.iter().enumerate() {
            writeln!(out, "{:>3}. {name}", position + 1).map_err(output_error)?;
        }
    }
    Ok(())
}

/// Run `thud check`: report every manifest and resolution problem.
///
/// Succeeds only when no problem was found.
pub fn run_check(dir: &Path, disabled: &[String], out: &mut impl Write) -> Result<(), ThudError> {
    let scan = scan_with_builtins(dir)?;
    let mut problems: Vec<String> = scan.errors.iter().map(ToString::to_string).collect();

    match resolve_manifests(&scan.manifests, disabled) {
        Ok(order) if problems.is_empty() => {
            writeln!(out, "ok: {} module(s) resolve cleanly", order.len()).map_err(output_error)?;
            return Ok(());
        }
        Ok(_) => {}
        Err(err) => problems.push(err.to_string()),
    }

    for problem in &problems {
        writeln!(out, "error: {problem}").map_err(output_error)?;
    }
    Err(ThudError::Manifest(format!(
        "{} problem(s) found in {}",
        problems.len(),
        dir.display()
    )))
}
