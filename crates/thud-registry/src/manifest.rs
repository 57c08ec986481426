// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module manifest parsing from `module.toml` files.
//!
//! A manifest states what a module is called, what it depends on, and which
//! components and events it provides, so a load order can be computed and
//! checked without executing any module code.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thud_core::ThudError;
use thud_core::descriptor::validate_parts;

use crate::resolver::DependencyResolver;

/// File name looked up inside each module directory.
pub const MANIFEST_FILE: &str = "module.toml";

/// Parsed module manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Modules that must be registered first.
    pub deps: Vec<String>,
    /// Component names the module exposes.
    pub components: Vec<String>,
    /// Event names the module subscribes to.
    pub events: Vec<String>,
    /// Minimum host version required (e.g., "0.1.0").
    pub min_thud_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleManifestFile {
    module: ModuleSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleSection {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    events: Vec<String>,
    min_thud_version: Option<String>,
}

/// Parse a module manifest from TOML content.
///
/// Applies the same structural rules as descriptor validation and rejects a
/// `min_thud_version` newer than this host.
pub fn parse_module_manifest(toml_content: &str) -> Result<ModuleManifest, ThudError> {
    let file: ModuleManifestFile = toml::from_str(toml_content)
        .map_err(|e| ThudError::Manifest(format!("invalid module manifest: {e}")))?;
    let section = file.module;

    let mut problems = validate_parts(
        &section.name,
        &section.version,
        &section.deps,
        section.components.iter().map(String::as_str),
        section.events.iter().map(String::as_str),
    );
    if let Some(required) = &section.min_thud_version {
        if let Err(problem) = check_host_version(required) {
            problems.push(problem);
        }
    }

    if !problems.is_empty() {
        return Err(ThudError::Manifest(format!(
            "module `{}`: {}",
            section.name,
            problems.join("; ")
        )));
    }

    Ok(ModuleManifest {
        name: section.name,
        version: section.version,
        description: section.description,
        deps: section.deps,
        components: section.components,
        events: section.events,
        min_thud_version: section.min_thud_version,
    })
}

fn check_host_version(required: &str) -> Result<(), String> {
    let required = semver::Version::parse(required)
        .map_err(|e| format!("min_thud_version `{required}` is not a valid version: {e}"))?;
    let host = semver::Version::parse(crate::HOST_VERSION).map_err(|e| {
        format!("host version `{}` is not a valid version: {e}", crate::HOST_VERSION)
    })?;
    if required > host {
        return Err(format!("requires thud {required} but this host is {host}"));
    }
    Ok(())
}

/// Parse a manifest file from disk.
pub fn load_manifest(path: &Path) -> Result<ModuleManifest, ThudError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ThudError::Manifest(format!("cannot read {}: {e}", path.display())))?;
    parse_module_manifest(&content).map_err(|e| match e {
        ThudError::Manifest(msg) => ThudError::Manifest(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Find manifest files under `dir`, sorted by path.
///
/// Accepts both `dir/<module>/module.toml` and flat `dir/<module>.toml`.
/// The sorted path order is the discovery order used for tie-breaking.
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>, ThudError> {
    let unreadable = |e: std::io::Error| {
        ThudError::Manifest(format!("cannot read module directory {}: {e}", dir.display()))
    };
    let entries = std::fs::read_dir(dir).map_err(unreadable)?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(unreadable)?.path();
        if path.is_dir() {
            let candidate = path.join(MANIFEST_FILE);
            if candidate.is_file() {
                paths.push(candidate);
            }
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    tracing::debug!(dir = %dir.display(), found = paths.len(), "module manifests discovered");
    Ok(paths)
}

/// Manifests found in a directory, plus every file that failed to parse.
#[derive(Debug, Default)]
pub struct ManifestScan {
    pub manifests: Vec<ModuleManifest>,
    pub errors: Vec<ThudError>,
}

/// Discover and parse every manifest under `dir`.
///
/// Individual parse failures are collected so a check can report all of them.
pub fn scan_manifests(dir: &Path) -> Result<ManifestScan, ThudError> {
    let mut scan = ManifestScan::default();
    for path in discover_manifests(dir)? {
        match load_manifest(&path) {
            Ok(manifest) => scan.manifests.push(manifest),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "skipping invalid module manifest"
                );
                scan.errors.push(err);
            }
        }
    }
    Ok(scan)
}

/// Compute the load order of `manifests`, leaving out any module named in `disabled`.
///
/// A module that depends on a disabled one fails with `UnresolvedDependency`.
pub fn resolve_manifests(
    manifests: &[ModuleManifest],
    disabled: &[String],
) -> Result<Vec<String>, ThudError> {
    let mut resolver = DependencyResolver::new();
    for manifest in manifests {
        if disabled.contains(&manifest.name) {
            tracing::debug!(module = %manifest.name, "module disabled by configuration");
            continue;
        }
        resolver.add_module(manifest.name.clone(), &manifest.deps);
    }
    resolver.resolve()
}
