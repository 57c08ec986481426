// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The module host: an explicit, shareable owner of the current registry.
//!
//! Readers (`invoke`, `publish`) work on an immutable snapshot and never
//! block each other. Writers (`load`, `unload`, `declare_payload`) are
//! serialized by a mutex, mutate a private copy, and publish it with one
//! atomic swap.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use thud_config::ThudConfig;
use thud_core::{ModuleDescriptor, Slot, ThudError};

use crate::loader::{self, LoadReport};
use crate::registry::{HostPolicy, Registry};

/// Shared module host.
pub struct Host {
    current: ArcSwap<Registry>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("modules", &self.current.load().module_names())
            .finish()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostPolicy::default())
    }
}

impl Host {
    /// Create an empty host.
    pub fn new(policy: HostPolicy) -> Self {
        Self {
            current: ArcSwap::from_pointee(Registry::new(policy)),
            writer: Mutex::new(()),
        }
    }

    /// Create an empty host with the policy from the `[host]` config section.
    pub fn from_config(config: &ThudConfig) -> Self {
        Self::new(HostPolicy::from(&config.host))
    }

    /// The registry as currently visible to readers.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    /// Load a batch of modules. See [`loader::load_modules`] for the failure policy.
    ///
    /// Modules registered before a registration failure stay visible after
    /// this call returns the error.
    pub fn load(&self, descriptors: Vec<ModuleDescriptor>) -> Result<LoadReport, ThudError> {
        let _guard = self.lock_writer();
        let mut working = Registry::clone(&self.current.load());
        let before = working.modules().len();

        let result = loader::load_modules(&mut working, descriptors);
        if working.modules().len() != before {
            self.current.store(Arc::new(working));
        }
        result
    }

    /// Unload one module and everything it registered.
    ///
    /// Fails with `ModuleInUse` while another registered module depends on
    /// it. A failing `on_unload` hook leaves the module registered.
    pub fn unload(&self, name: &str) -> Result<(), ThudError> {
        let _guard = self.lock_writer();
        let mut working = Registry::clone(&self.current.load());

        let Some(module) = working.module(name) else {
            return Err(ThudError::UnknownModule {
                name: name.to_string(),
            });
        };

        let dependents = working.dependents_of(name);
        if !dependents.is_empty() {
            return Err(ThudError::ModuleInUse {
                name: name.to_string(),
                dependents,
            });
        }

        if let Some(lifecycle) = &module.lifecycle {
            lifecycle
                .on_unload()
                .map_err(|err| ThudError::ModuleLifecycle {
                    module: name.to_string(),
                    source: Box::new(err),
                })?;
        }

        working.remove_module(name);
        self.current.store(Arc::new(working));
        tracing::info!(module = name, "module unloaded");
        Ok(())
    }

    /// Require payloads published on `event` to be of type `T`.
    pub fn declare_payload<T: Any>(&self, event: &str) {
        let _guard = self.lock_writer();
        let mut working = Registry::clone(&self.current.load());
        working.declare_payload::<T>(event);
        self.current.store(Arc::new(working));
    }

    /// Invoke a component by bare or `module/name` qualified name.
    pub fn invoke(
        &self,
        name: &str,
        slot: Slot,
        format: &str,
        buf: &mut [u8],
    ) -> Result<usize, ThudError> {
        self.current.load().invoke(name, slot, format, buf)
    }

    /// Publish an event to every subscribed handler.
    pub fn publish(&self, event: &str, payload: &dyn Any) -> Result<usize, ThudError> {
        self.current.load().publish(event, payload)
    }

    /// Registered module names in registration order.
    pub fn module_names(&self) -> Vec<String> {
        self.current.load().module_names()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.current.load().module(name).is_some()
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thud_core::traits::component::write_truncated;
    use thud_core::{ComponentScope, EventData, ModuleLifecycle};

    fn echo(_slot: Slot, format: &str, buf: &mut [u8]) -> usize {
        write_truncated(format.as_bytes(), buf)
    }

    #[test]
    fn load_then_invoke() {
        let host = Host::default();
        host.load(vec![ModuleDescriptor::new("A", "1").with_component("echo", echo)])
            .unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(host.invoke("echo", 0, "0123456789", &mut buf).unwrap(), 10);
        assert_eq!(&buf, b"012");
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let host = Host::default();
        let before = host.snapshot();
        host.load(vec![ModuleDescriptor::new("A", "1")]).unwrap();
        assert!(before.modules().is_empty());
        assert_eq!(host.snapshot().module_names(), vec!["A"]);
    }

    #[test]
    fn partial_registration_is_visible_after_error() {
        let host = Host::default();
        let err = host
            .load(vec![
                ModuleDescriptor::new("a", "1").with_component("x", echo),
                ModuleDescriptor::new("b", "1").with_component("x", echo),
            ])
            .unwrap_err();
        assert!(matches!(err, ThudError::DuplicateComponent { .. }));
        assert_eq!(host.module_names(), vec!["a"]);
    }

    #[test]
    fn resolution_error_does_not_swap() {
        let host = Host::default();
        let before = host.snapshot();
        let err = host
            .load(vec![ModuleDescriptor::new("a", "1").with_dependency("missing")])
            .unwrap_err();
        assert!(matches!(err, ThudError::UnresolvedDependency { .. }));
        assert!(Arc::ptr_eq(&before, &host.snapshot()));
    }

    #[test]
    fn unload_unknown_module_fails() {
        let host = Host::default();
        assert!(matches!(
            host.unload("ghost").unwrap_err(),
            ThudError::UnknownModule { name } if name == "ghost"
        ));
    }

    #[test]
    fn unload_refuses_while_dependents_exist() {
        let host = Host::default();
        host.load(vec![
            ModuleDescriptor::new("base", "1"),
            ModuleDescriptor::new("app", "1").with_dependency("base"),
        ])
        .unwrap();

        match host.unload("base").unwrap_err() {
            ThudError::ModuleInUse { dependents, .. } => assert_eq!(dependents, vec!["app"]),
            other => panic!("unexpected error: {other}"),
        }

        host.unload("app").unwrap();
        host.unload("base").unwrap();
        assert!(host.module_names().is_empty());
    }

    #[test]
    fn unload_removes_components_and_handlers() {
        let host = Host::default();
        host.load(vec![
            ModuleDescriptor::new("a", "1")
                .with_component("echo", echo)
                .with_handler("tick", |_d: &EventData<'_>| -> Result<(), ThudError> { Ok(()) }),
        ])
        .unwrap();
        assert_eq!(host.publish("tick", &()).unwrap(), 1);

        host.unload("a").unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(
            host.invoke("echo", 0, "x", &mut buf).unwrap_err(),
            ThudError::UnknownComponent { .. }
        ));
        assert_eq!(host.publish("tick", &()).unwrap(), 0);
    }

    struct CountingUnload(Arc<AtomicUsize>);

    impl ModuleLifecycle for CountingUnload {
        fn on_unload(&self) -> Result<(), ThudError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn unload_runs_hook_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let host = Host::default();
        host.load(vec![
            ModuleDescriptor::new("a", "1").with_lifecycle(CountingUnload(Arc::clone(&calls))),
        ])
        .unwrap();
        host.unload("a").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct StubbornUnload;

    impl ModuleLifecycle for StubbornUnload {
        fn on_unload(&self) -> Result<(), ThudError> {
            Err(ThudError::Handler("busy".into()))
        }
    }

    #[test]
    fn failing_unload_hook_keeps_module() {
        let host = Host::default();
        host.load(vec![ModuleDescriptor::new("a", "1").with_lifecycle(StubbornUnload)])
            .unwrap();
        assert!(matches!(
            host.unload("a").unwrap_err(),
            ThudError::ModuleLifecycle { .. }
        ));
        assert!(host.is_loaded("a"));
    }

    #[test]
    fn declared_payload_survives_later_loads() {
        let host = Host::default();
        host.declare_payload::<u32>("count");
        assert_eq!(host.publish("count", &"three").unwrap(), 0);

        host.load(vec![
            ModuleDescriptor::new("a", "1")
                .with_handler("count", |_d: &EventData<'_>| -> Result<(), ThudError> { Ok(()) }),
        ])
        .unwrap();
        assert!(matches!(
            host.publish("count", &"three").unwrap_err(),
            ThudError::PayloadMismatch { .. }
        ));
        assert_eq!(host.publish("count", &3u32).unwrap(), 1);
    }

    #[test]
    fn from_config_applies_scope() {
        let mut config = ThudConfig::default();
        config.host.component_scope = ComponentScope::Module;
        let host = Host::from_config(&config);
        host.load(vec![
            ModuleDescriptor::new("a", "1").with_component("x", echo),
            ModuleDescriptor::new("b", "1").with_component("x", echo),
        ])
        .unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(host.invoke("b/x", 0, "hi", &mut buf).unwrap(), 2);
    }
}
