// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module descriptors: the identity and manifest of a module.
//!
//! A [`ModuleDescriptor`] is built once when the module is defined and is
//! immutable from the host's point of view afterwards. Lists are plain
//! length-carrying vectors; sentinel termination only exists at the C layout
//! boundary in `thud-abi`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ThudError;
use crate::traits::{Component, EventHandler, ModuleLifecycle};
use crate::types::QUALIFIED_SEPARATOR;

/// A named, invocable capability owned by a module.
#[derive(Clone)]
pub struct ComponentRecord {
    pub name: String,
    pub callback: Arc<dyn Component>,
}

impl std::fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A subscription of one callback to one event name.
#[derive(Clone)]
pub struct HandlerRecord {
    pub event: String,
    pub callback: Arc<dyn EventHandler>,
}

impl std::fmt::Debug for HandlerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRecord")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Identity and manifest of a module.
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Non-empty unique module name.
    pub name: String,
    /// Opaque version string.
    pub version: String,
    /// Names of modules that must be registered before this one.
    pub deps: Vec<String>,
    pub components: Vec<ComponentRecord>,
    pub handlers: Vec<HandlerRecord>,
    pub lifecycle: Option<Arc<dyn ModuleLifecycle>>,
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("deps", &self.deps)
            .field("components", &self.components)
            .field("handlers", &self.handlers)
            .field("lifecycle", &self.lifecycle.is_some())
            .finish()
    }
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            deps: Vec::new(),
            components: Vec::new(),
            handlers: Vec::new(),
            lifecycle: None,
        }
    }

    /// Add dependency
    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        self.deps.push(dep.into());
        self
    }

    pub fn with_component(
        mut self,
        name: impl Into<String>,
        callback: impl Component + 'static,
    ) -> Self {
        self.components.push(ComponentRecord {
            name: name.into(),
            callback: Arc::new(callback),
        });
        self
    }

    pub fn with_handler(
        mut self,
        event: impl Into<String>,
        callback: impl EventHandler + 'static,
    ) -> Self {
        self.handlers.push(HandlerRecord {
            event: event.into(),
            callback: Arc::new(callback),
        });
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: impl ModuleLifecycle + 'static) -> Self {
        self.lifecycle = Some(Arc::new(lifecycle));
        self
    }

    /// Names of the components this module exposes, in declaration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }

    /// Check the structural rules every descriptor must satisfy.
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn validate(&self) -> Result<(), ThudError> {
        let problems = validate_parts(
            &self.name,
            &self.version,
            &self.deps,
            self.components.iter().map(|c| c.name.as_str()),
            self.handlers.iter().map(|h| h.event.as_str()),
        );
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ThudError::InvalidModule {
                module: self.name.clone(),
                problems,
            })
        }
    }
}

/// Validation shared by descriptors and static manifests.
pub fn validate_parts<'a>(
    name: &str,
    version: &str,
    deps: &[String],
    components: impl IntoIterator<Item = &'a str>,
    events: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(problem) = check_identifier("module name", name) {
        problems.push(problem);
    } else if name.contains(QUALIFIED_SEPARATOR) {
        problems.push(format!("module name must not contain `{QUALIFIED_SEPARATOR}`"));
    }

    if version.contains('\0') {
        problems.push("version must not contain NUL bytes".to_string());
    }

    let mut seen_deps = HashSet::new();
    for dep in deps {
        if let Some(problem) = check_identifier("dependency name", dep) {
            problems.push(problem);
            continue;
        }
        if dep == name {
            problems.push("module must not depend on itself".to_string());
        }
        if !seen_deps.insert(dep.as_str()) {
            problems.push(format!("dependency `{dep}` is listed more than once"));
        }
    }

    let mut seen_components = HashSet::new();
    for component in components {
        if let Some(problem) = check_identifier("component name", component) {
            problems.push(problem);
            continue;
        }
        if component.contains(QUALIFIED_SEPARATOR) {
            problems.push(format!(
                "component name `{component}` must not contain `{QUALIFIED_SEPARATOR}`"
            ));
        }
        if !seen_components.insert(component) {
            problems.push(format!("component `{component}` is declared more than once"));
        }
    }

    for event in events {
        if let Some(problem) = check_identifier("event name", event) {
            problems.push(problem);
        }
    }

    problems
}

fn check_identifier(what: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{what} must not be empty"));
    }
    if value.trim() != value {
        return Some(format!("{what} `{value}` has leading or trailing whitespace"));
    }
    if value.chars().any(char::is_control) {
        return Some(format!("{what} `{}` contains control characters", value.escape_debug()));
    }
    None
}
