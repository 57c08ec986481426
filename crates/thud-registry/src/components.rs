// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component registry: maps component names to their owning module's entry point.
//!
//! Under [`ComponentScope::Global`] a bare name identifies at most one
//! component. Under [`ComponentScope::Module`] several modules may expose the
//! same name; a bare lookup then succeeds only when it is unambiguous, and
//! `module/name` always selects one.

use std::collections::HashMap;
use std::sync::Arc;

use thud_core::types::split_qualified;
use thud_core::{Component, ComponentRecord, ComponentScope, Slot, ThudError};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A component as stored in the registry.
#[derive(Clone)]
pub struct ComponentEntry {
    pub module: String,
    pub name: String,
    pub callback: Arc<dyn Component>,
}

impl ComponentEntry {
    /// `module/name` form of this component's name.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.module, self.name)
    }
}

impl std::fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("module", &self.module)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of components indexed by bare name.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    scope: ComponentScope,
    /// Owners of each bare name, in registration order.
    entries: HashMap<String, Vec<ComponentEntry>>,
}

impl ComponentRegistry {
    /// Create an empty registry with the given naming scope.
    pub fn new(scope: ComponentScope) -> Self {
        Self {
            scope,
            entries: HashMap::new(),
        }
    }

    pub fn scope(&self) -> ComponentScope {
        self.scope
    }

    /// Check whether `module` may register a component called `name`.
    pub fn check(&self, module: &str, name: &str) -> Result<(), ThudError> {
        let Some(owners) = self.entries.get(name) else {
            return Ok(());
        };
        let collision = match self.scope {
            ComponentScope::Global => owners.first(),
            ComponentScope::Module => owners.iter().find(|e| e.module == module),
        };
        match collision {
            Some(existing) => Err(ThudError::DuplicateComponent {
                module: module.to_string(),
                name: name.to_string(),
                existing: existing.module.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Register one component of `module`.
    pub fn register(&mut self, module: &str, record: &ComponentRecord) -> Result<(), ThudError> {
        self.check(module, &record.name)?;
        tracing::debug!(module, component = %record.name, "component registered");
        self.entries
            .entry(record.name.clone())
            .or_default()
            .push(ComponentEntry {
                module: module.to_string(),
                name: record.name.clone(),
                callback: Arc::clone(&record.callback),
            });
        Ok(())
    }

    /// Remove every component owned by `module`. Returns how many were removed.
    pub fn unregister_module(&mut self, module: &str) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, owners| {
            let before = owners.len();
            owners.retain(|e| e.module != module);
            removed += before - owners.len();
            !owners.is_empty()
        });
        removed
    }

    /// Find the component a (bare or qualified) name refers to.
    pub fn lookup(&self, name: &str) -> Result<&ComponentEntry, ThudError> {
        if let Some((module, component)) = split_qualified(name) {
            return self
                .entries
                .get(component)
                .and_then(|owners| owners.iter().find(|e| e.module == module))
                .ok_or_else(|| self.unknown(name));
        }

        match self.entries.get(name).map(Vec::as_slice) {
            Some([only]) => Ok(only),
            Some(owners) if owners.len() > 1 => Err(ThudError::AmbiguousComponent {
                name: name.to_string(),
                modules: owners.iter().map(|e| e.module.clone()).collect(),
            }),
            _ => Err(self.unknown(name)),
        }
    }

    /// Call a component and return its result verbatim.
    ///
    /// `buf.len()` is the capacity handed to the callback; an empty buffer
    /// asks for the required size only. Registry state is never modified.
    pub fn invoke(
        &self,
        name: &str,
        slot: Slot,
        format: &str,
        buf: &mut [u8],
    ) -> Result<usize, ThudError> {
        let entry = self.lookup(name)?;
        let size = entry.callback.invoke(slot, format, buf);
        tracing::trace!(
            module = %entry.module,
            component = %entry.name,
            slot,
            capacity = buf.len(),
            size,
            "component invoked"
        );
        Ok(size)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// All components, sorted by module then name.
    pub fn list(&self) -> Vec<&ComponentEntry> {
        let mut all: Vec<&ComponentEntry> = self.entries.values().flatten().collect();
        all.sort_by(|a, b| (&a.module, &a.name).cmp(&(&b.module, &b.name)));
        all
    }

    /// Components owned by `module`, sorted by name.
    pub fn owned_by(&self, module: &str) -> Vec<&ComponentEntry> {
        let mut owned: Vec<&ComponentEntry> = self
            .entries
            .values()
            .flatten()
            .filter(|e| e.module == module)
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        owned
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unknown(&self, name: &str) -> ThudError {
        let qualified = split_qualified(name).is_some();
        let candidates: Vec<String> = self
            .entries
            .values()
            .flatten()
            .map(|e| if qualified { e.qualified_name() } else { e.name.clone() })
            .collect();

        let mut best_score = SUGGESTION_THRESHOLD;
        let mut suggestion = None;
        for candidate in candidates {
            let score = strsim::jaro_winkler(name, &candidate);
            if score > best_score {
                best_score = score;
                suggestion = Some(candidate);
            }
        }

        ThudError::UnknownComponent {
            name: name.to_string(),
            suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thud_core::traits::component::write_truncated;

    fn record(name: &str, output: &'static str) -> ComponentRecord {
        ComponentRecord {
            name: name.to_string(),
            callback: Arc::new(move |_slot: Slot, _format: &str, buf: &mut [u8]| {
                write_truncated(output.as_bytes(), buf)
            }),
        }
    }

    fn echo() -> ComponentRecord {
        ComponentRecord {
            name: "echo".to_string(),
            callback: Arc::new(|_slot: Slot, format: &str, buf: &mut [u8]| {
                write_truncated(format.as_bytes(), buf)
            }),
        }
    }

    #[test]
    fn register_and_invoke_roundtrip() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry.register("core", &echo()).unwrap();

        let mut buf = [0u8; 16];
        let n = registry.invoke("echo", 0, "hello", &mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf[..5], b"hello");
        assert_eq!(buf[5], 0, "no terminator beyond what the callback writes");
    }

    #[test]
    fn truncating_invoke_returns_full_size() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry.register("A", &echo()).unwrap();

        let mut buf = [b'.'; 10];
        let n = registry.invoke("echo", 0, "0123456789", &mut buf[..3]).unwrap();
        assert_eq!(n, 10);
        assert_eq!(&buf, b"012.......");
    }

    #[test]
    fn zero_capacity_reports_size_without_writing() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry.register("A", &echo()).unwrap();

        let mut buf = [b'.'; 4];
        let n = registry.invoke("echo", 0, "abcdef", &mut buf[..0]).unwrap();
        assert_eq!(n, 6);
        assert_eq!(&buf, b"....");
    }

    #[test]
    fn slot_is_passed_verbatim() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry
            .register(
                "A",
                &ComponentRecord {
                    name: "slot".to_string(),
                    callback: Arc::new(|slot: Slot, _f: &str, buf: &mut [u8]| {
                        write_truncated(&[slot], buf)
                    }),
                },
            )
            .unwrap();

        let mut buf = [0u8; 1];
        registry.invoke("slot", 200, "", &mut buf).unwrap();
        assert_eq!(buf[0], 200);
    }

    #[test]
    fn global_scope_rejects_name_from_other_module() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry.register("a", &echo()).unwrap();
        match registry.register("b", &echo()).unwrap_err() {
            ThudError::DuplicateComponent { module, name, existing } => {
                assert_eq!(module, "b");
                assert_eq!(name, "echo");
                assert_eq!(existing, "a");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn module_scope_allows_same_name_in_different_modules() {
        let mut registry = ComponentRegistry::new(ComponentScope::Module);
        registry.register("a", &record("name", "from-a")).unwrap();
        registry.register("b", &record("name", "from-b")).unwrap();
        assert!(registry.register("a", &record("name", "again")).is_err());

        let mut buf = [0u8; 8];
        let n = registry.invoke("b/name", 0, "", &mut buf).unwrap();
        assert_eq!(&buf[..n], b"from-b");

        match registry.invoke("name", 0, "", &mut buf).unwrap_err() {
            ThudError::AmbiguousComponent { modules, .. } => assert_eq!(modules, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unambiguous_bare_name_works_in_module_scope() {
        let mut registry = ComponentRegistry::new(ComponentScope::Module);
        registry.register("a", &record("only", "x")).unwrap();
        assert!(registry.contains("only"));
        assert!(registry.contains("a/only"));
        assert!(!registry.contains("b/only"));
    }

    #[test]
    fn unknown_component_suggests_close_name() {
        let mut registry = ComponentRegistry::new(ComponentScope::Global);
        registry.register("core", &echo()).unwrap();

        let mut buf = [0u8; 4];
        match registry.invoke("ecoh", 0, "", &mut buf).unwrap_err() {
            ThudError::UnknownComponent { name, suggestion } => {
                assert_eq!(name, "ecoh");
                assert_eq!(suggestion.as_deref(), Some("echo"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_module_removes_only_its_components() {
        let mut registry = ComponentRegistry::new(ComponentScope::Module);
        registry.register("a", &record("x", "")).unwrap();
        registry.register("a", &record("y", "")).unwrap();
        registry.register("b", &record("x", "")).unwrap();

        assert_eq!(registry.unregister_module("a"), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("x"));
        assert!(!registry.contains("y"));
        assert_eq!(registry.unregister_module("a"), 0);
    }

    #[test]
    fn list_is_sorted_by_module_then_name() {
        let mut registry = ComponentRegistry::new(ComponentScope::Module);
        registry.register("b", &record("z", "")).unwrap();
        registry.register("a", &record("y", "")).unwrap();
        registry.register("a", &record("x", "")).unwrap();

        let names: Vec<String> = registry.list().iter().map(|e| e.qualified_name()).collect();
        assert_eq!(names, vec!["a/x", "a/y", "b/z"]);
        assert_eq!(registry.owned_by("a").len(), 2);
    }
}
