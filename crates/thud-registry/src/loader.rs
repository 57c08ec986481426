// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch module loading: validate, resolve, then register in dependency order.
//!
//! Validation and resolution happen before the registry is touched, so their
//! failures leave it exactly as it was. Registration failures stop the pass
//! but keep every module registered before the failing one.

use serde::Serialize;
use thud_core::{ModuleDescriptor, ThudError};

use crate::registry::Registry;
use crate::resolver::DependencyResolver;

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Module names in the order they were registered.
    pub order: Vec<String>,
}

/// Compute the load order for `descriptors` against what `registry` already holds.
pub fn plan(
    registry: &Registry,
    descriptors: &[ModuleDescriptor],
) -> Result<Vec<usize>, ThudError> {
    for descriptor in descriptors {
        descriptor.validate()?;
    }

    let mut resolver = DependencyResolver::new().with_available(registry.module_names());
    for descriptor in descriptors {
        resolver.add_module(descriptor.name.clone(), &descriptor.deps);
    }
    resolver.resolve_indices()
}

/// Load a batch of discovered modules into `registry`.
///
/// Each module registers atomically and then runs its `on_load` hook, which
/// may call components of modules registered before it. A failing hook
/// removes that module again and ends the pass.
pub fn load_modules(
    registry: &mut Registry,
    descriptors: Vec<ModuleDescriptor>,
) -> Result<LoadReport, ThudError> {
    let order = plan(registry, &descriptors)?;

    let mut report = LoadReport::default();
    for index in order {
        let descriptor = &descriptors[index];
        if let Err(err) = register_one(registry, descriptor) {
            tracing::warn!(
                module = %descriptor.name,
                registered = report.order.len(),
                error = %err,
                "module load aborted"
            );
            return Err(err);
        }
        report.order.push(descriptor.name.clone());
    }

    tracing::info!(modules = ?report.order, "modules loaded");
    Ok(report)
}

fn register_one(registry: &mut Registry, descriptor: &ModuleDescriptor) -> Result<(), ThudError> {
    registry.register_module(descriptor)?;

    if let Some(lifecycle) = &descriptor.lifecycle {
        if let Err(err) = lifecycle.on_load(&*registry) {
            registry.remove_module(&descriptor.name);
            return Err(ThudError::ModuleLifecycle {
                module: descriptor.name.clone(),
                source: Box::new(err),
            });
        }
    }
    Ok(())
}
