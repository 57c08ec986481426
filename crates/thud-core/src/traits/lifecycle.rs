// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional load/unload hooks for modules.

use std::any::Any;

use crate::error::ThudError;
use crate::types::Slot;

/// Read access to the registry a module is being loaded into.
///
/// Passed to [`ModuleLifecycle::on_load`] so a module can call components of
/// the modules it depends on, which are always registered first.
pub trait RegistryView {
    fn invoke(
        &self,
        name: &str,
        slot: Slot,
        format: &str,
        buf: &mut [u8],
    ) -> Result<usize, ThudError>;

    fn publish(&self, event: &str, payload: &dyn Any) -> Result<usize, ThudError>;

    fn has_module(&self, name: &str) -> bool;
}

/// Hooks run by the host around a module's registered lifetime.
pub trait ModuleLifecycle: Send + Sync {
    /// Runs after the module's components and handlers are registered.
    /// An error removes the module again and aborts the remaining load.
    fn on_load(&self, registry: &dyn RegistryView) -> Result<(), ThudError> {
        let _ = registry;
        Ok(())
    }

    /// Runs before the module's entries are removed on unload.
    fn on_unload(&self) -> Result<(), ThudError> {
        Ok(())
    }
}
