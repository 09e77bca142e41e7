// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with figment.
//!
//! Merge order, later wins:
//! 1. compiled defaults
//! 2. `/etc/trellis/trellis.toml`
//! 3. `~/.config/trellis/trellis.toml`
//! 4. `./trellis.toml`
//! 5. `TRELLIS_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TrellisConfig;

pub const SYSTEM_CONFIG: &str = "/etc/trellis/trellis.toml";
pub const LOCAL_CONFIG: &str = "trellis.toml";
pub const ENV_PREFIX: &str = "TRELLIS_";

/// Sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &["search", "layout", "loader", "log"];

/// `~/.config/trellis/trellis.toml`, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trellis").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<TrellisConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only, without files or env vars.
pub fn load_config_from_str(toml_content: &str) -> Result<TrellisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrellisConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrellisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrellisConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TrellisConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Map a prefix-stripped, lowercased env key to a config path.
///
/// Only the first underscore after a known section becomes a dot, so
/// `TRELLIS_LAYOUT_SOURCE_EXTENSION` maps to `layout.source_extension`.
/// Keys outside the known sections are returned unchanged.
pub fn map_env_key(key: &str) -> String {
    ENV_SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or_else(|| key.to_string())
}

/// `TRELLIS_*` provider. `TRELLIS_PATH` is the plugin search path, not a
/// config key, and is ignored here.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["path"])
        .map(|key| map_env_key(key.as_str()).into())
}
