// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The host registry: registered modules plus their components and handlers.
//!
//! A `Registry` is a plain value. The [`Host`](crate::host::Host) keeps the
//! current one behind an atomic pointer and mutates copies of it, so a
//! registry that readers can see is never modified in place.

use std::any::Any;
use std::sync::Arc;

use thud_config::model::HostConfig;
use thud_core::{ComponentScope, ModuleDescriptor, ModuleLifecycle, RegistryView, Slot, ThudError};

use crate::components::ComponentRegistry;
use crate::events::EventDispatcher;

/// Policy knobs the registry is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPolicy {
    pub component_scope: ComponentScope,
    pub catch_panics: bool,
}

impl Default for HostPolicy {
    fn default() -> Self {
        Self {
            component_scope: ComponentScope::Global,
            catch_panics: true,
        }
    }
}

impl From<&HostConfig> for HostPolicy {
    fn from(config: &HostConfig) -> Self {
        Self {
            component_scope: config.component_scope,
            catch_panics: config.catch_panics,
        }
    }
}

/// What the registry remembers about a registered module.
#[derive(Clone)]
pub struct RegisteredModule {
    pub name: String,
    pub version: String,
    pub deps: Vec<String>,
    /// Component names in declaration order.
    pub components: Vec<String>,
    /// Subscribed event names in declaration order (repeats allowed).
    pub events: Vec<String>,
    pub(crate) lifecycle: Option<Arc<dyn ModuleLifecycle>>,
}

impl std::fmt::Debug for RegisteredModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModule")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("deps", &self.deps)
            .field("components", &self.components)
            .field("events", &self.events)
            .finish()
    }
}

/// Registered modules, components, and event subscriptions.
#[derive(Debug, Clone)]
pub struct Registry {
    policy: HostPolicy,
    /// Registration order.
    modules: Vec<RegisteredModule>,
    components: ComponentRegistry,
    events: EventDispatcher,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(HostPolicy::default())
    }
}

impl Registry {
    pub fn new(policy: HostPolicy) -> Self {
        Self {
            policy,
            modules: Vec::new(),
            components: ComponentRegistry::new(policy.component_scope),
            events: EventDispatcher::new(policy.catch_panics),
        }
    }

    pub fn policy(&self) -> HostPolicy {
        self.policy
    }

    /// Register a module's components and handlers as one unit.
    ///
    /// Every collision is checked before anything is inserted, so on error
    /// the registry is unchanged.
    pub fn register_module(&mut self, descriptor: &ModuleDescriptor) -> Result<(), ThudError> {
        descriptor.validate()?;

        if self.module(&descriptor.name).is_some() {
            return Err(ThudError::DuplicateModule {
                name: descriptor.name.clone(),
            });
        }
        for component in &descriptor.components {
            self.components.check(&descriptor.name, &component.name)?;
        }

        for component in &descriptor.components {
            self.components.register(&descriptor.name, component)?;
        }
        for handler in &descriptor.handlers {
            self.events.subscribe(&descriptor.name, handler);
        }
        self.modules.push(RegisteredModule {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            deps: descriptor.deps.clone(),
            components: descriptor.components.iter().map(|c| c.name.clone()).collect(),
            events: descriptor.handlers.iter().map(|h| h.event.clone()).collect(),
            lifecycle: descriptor.lifecycle.clone(),
        });

        tracing::debug!(
            module = %descriptor.name,
            version = %descriptor.version,
            components = descriptor.components.len(),
            handlers = descriptor.handlers.len(),
            "module registered"
        );
        Ok(())
    }

    /// Remove a module and everything it registered. Dependents are not checked.
    pub fn remove_module(&mut self, name: &str) -> Option<RegisteredModule> {
        let position = self.modules.iter().position(|m| m.name == name)?;
        let module = self.modules.remove(position);
        let components = self.components.unregister_module(name);
        let handlers = self.events.unsubscribe_module(name);
        tracing::debug!(module = name, components, handlers, "module removed");
        Some(module)
    }

    /// Registered modules that list `name` as a dependency, in registration order.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.modules
            .iter()
            .filter(|m| m.deps.iter().any(|d| d == name))
            .map(|m| m.name.clone())
            .collect()
    }

    pub fn module(&self, name: &str) -> Option<&RegisteredModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Modules in registration order.
    pub fn modules(&self) -> &[RegisteredModule] {
        &self.modules
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Require payloads published on `event` to be of type `T`.
    pub fn declare_payload<T: Any>(&mut self, event: &str) {
        self.events.declare_payload::<T>(event);
    }

    pub fn invoke(
        &self,
        name: &str,
        slot: Slot,
        format: &str,
        buf: &mut [u8],
    ) -> Result<usize, ThudError> {
        self.components.invoke(name, slot, format, buf)
    }

    pub fn publish(&self, event: &str, payload: &dyn Any) -> Result<usize, ThudError> {
        self.events.publish(event, payload)
    }
}

impl RegistryView for Registry {
    fn invoke(
        &self,
        name: &str,
        slot: Slot,
        format: &str,
        buf: &mut [u8],
    ) -> Result<usize, ThudError> {
        Registry::invoke(self, name, slot, format, buf)
    }

    fn publish(&self, event: &str, payload: &dyn Any) -> Result<usize, ThudError> {
        Registry::publish(self, event, payload)
    }

    fn has_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }
}
