// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/thud/thud.toml`, `~/.config/thud/thud.toml`, `./thud.toml`,
//! then `THUD_*` environment variables.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ThudConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/thud/thud.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "thud.toml";

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("thud").join(LOCAL_CONFIG_FILE))
}

/// Build the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ThudConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ThudConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<ThudConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThudConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ThudConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThudConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Map `THUD_SECTION_KEY` variables onto `section.key`.
///
/// Only the section prefix is rewritten so keys containing underscores
/// (`THUD_HOST_COMPONENT_SCOPE`) stay intact.
fn env_provider() -> Env {
    Env::prefixed("THUD_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ["host", "log", "modules"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
