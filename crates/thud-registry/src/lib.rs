// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module host for Thud: dependency resolution, component and event
//! registries, batch loading, and the shared copy-on-write [`Host`].
//!
//! ```
//! use thud_registry::{Host, builtin_modules};
//!
//! let host = Host::default();
//! host.load(builtin_modules()).unwrap();
//!
//! let mut buf = [0u8; 3];
//! assert_eq!(host.invoke("echo", 0, "0123456789", &mut buf).unwrap(), 10);
//! assert_eq!(&buf, b"012");
//! ```

pub mod catalog;
pub mod components;
pub mod events;
pub mod host;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod resolver;

/// Version of this host, checked against `min_thud_version` in manifests.
pub const HOST_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use catalog::{CORE_MODULE, builtin_manifests, builtin_modules};
pub use components::{ComponentEntry, ComponentRegistry};
pub use events::{EventDispatcher, Subscription};
pub use host::Host;
pub use loader::{LoadReport, load_modules};
pub use manifest::{ModuleManifest, parse_module_manifest, resolve_manifests, scan_manifests};
pub use registry::{HostPolicy, RegisteredModule, Registry};
pub use resolver::{DependencyResolver, resolve_order};
