// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module graphs and manifest directories used across test suites.

use std::path::Path;

use tempfile::TempDir;
use thud_core::ModuleDescriptor;

use crate::mock_component::EchoComponent;

/// An empty module named `name` depending on `deps`.
pub fn module(name: &str, deps: &[&str]) -> ModuleDescriptor {
    deps.iter()
        .fold(ModuleDescriptor::new(name, "1.0"), |m, dep| m.with_dependency(*dep))
}

/// `A`, `B -> A`, `C -> A, B`, discovered as `[C, B, A]`.
pub fn diamond_chain() -> Vec<ModuleDescriptor> {
    vec![module("C", &["A", "B"]), module("B", &["A"]), module("A", &[])]
}

/// `X -> Y`, `Y -> X`.
pub fn two_cycle() -> Vec<ModuleDescriptor> {
    vec![module("X", &["Y"]), module("Y", &["X"])]
}

/// Module `A` exposing an `echo` component.
pub fn echo_module() -> ModuleDescriptor {
    ModuleDescriptor::new("A", "1.0").with_component("echo", EchoComponent)
}

/// Write one `<name>/module.toml` manifest into `dir`.
pub fn write_manifest(dir: &Path, name: &str, deps: &[&str]) -> std::io::Result<()> {
    let module_dir = dir.join(name);
    std::fs::create_dir_all(&module_dir)?;
    let deps: Vec<String> = deps.iter().map(|d| format!("\"{d}\"")).collect();
    let body = format!(
        "[module]\nname = \"{name}\"\nversion = \"1.0\"\ndescription = \"fixture\"\ndeps = [{}]\n",
        deps.join(", ")
    );
    std::fs::write(module_dir.join("module.toml"), body)
}

/// A temporary directory with one manifest per `(name, deps)` pair.
pub fn manifest_dir(modules: &[(&str, &[&str])]) -> std::io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (name, deps) in modules {
        write_manifest(dir.path(), name, deps)?;
    }
    tracing::debug!(
        path = %dir.path().display(),
        modules = modules.len(),
        "fixture manifests written"
    );
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_valid_descriptors() {
        for m in diamond_chain().iter().chain(two_cycle().iter()) {
            m.validate().unwrap();
        }
        echo_module().validate().unwrap();
    }

    #[test]
    fn manifest_dir_writes_one_file_per_module() {
        let dir = manifest_dir(&[("a", &[]), ("b", &["a"])]).unwrap();
        let body = std::fs::read_to_string(dir.path().join("b/module.toml")).unwrap();
        assert!(body.contains("deps = [\"a\"]"));
        assert!(dir.path().join("a/module.toml").is_file());
    }
}
