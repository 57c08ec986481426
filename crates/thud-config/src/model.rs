// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Thud host.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};
use thud_core::ComponentScope;

/// Top-level Thud configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThudConfig {
    /// Registry policy.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Module discovery settings.
    #[serde(default)]
    pub modules: ModulesConfig,
}

/// Registry policy applied by the host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Whether component names are unique globally or per module.
    #[serde(default)]
    pub component_scope: ComponentScope,

    /// Convert handler panics into collected failures instead of unwinding
    /// through `publish`.
    #[serde(default = "default_catch_panics")]
    pub catch_panics: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            component_scope: ComponentScope::default(),
            catch_panics: default_catch_panics(),
        }
    }
}

fn default_catch_panics() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Module discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModulesConfig {
    /// Directory scanned for `module.toml` manifests.
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: String,

    /// Module names skipped during discovery.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            manifest_dir: default_manifest_dir(),
            disabled: Vec::new(),
        }
    }
}

fn default_manifest_dir() -> String {
    "modules".to_string()
}
