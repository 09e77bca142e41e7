// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! keys at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use trellis_core::{ImportErrorPolicy, Layout, SearchPath};

/// Top-level Trellis configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrellisConfig {
    /// Where plugin namespaces are searched.
    #[serde(default)]
    pub search: SearchConfig,

    /// File naming of modules and packages.
    #[serde(default)]
    pub layout: Layout,

    /// Loader behavior.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Logging settings for the binary.
    #[serde(default)]
    pub log: LogConfig,
}

impl TrellisConfig {
    /// The effective search path: `TRELLIS_PATH` roots (if enabled) followed
    /// by the configured roots.
    pub fn search_path(&self) -> SearchPath {
        self.search_path_with(SearchPath::from_env())
    }

    /// Like [`search_path`](Self::search_path) with an explicit env search path.
    pub fn search_path_with(&self, env: SearchPath) -> SearchPath {
        let mut path = if self.search.use_env_path {
            env
        } else {
            SearchPath::default()
        };
        path.extend(self.search.roots.iter().cloned());
        path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Extra search roots, searched after `TRELLIS_PATH`.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Whether `TRELLIS_PATH` contributes roots.
    #[serde(default = "default_true")]
    pub use_env_path: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            use_env_path: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// `skip` drops modules that fail to import; `fail` aborts the load.
    #[serde(default)]
    pub import_errors: ImportErrorPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
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

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_roots_come_first() {
        let config = TrellisConfig {
            search: SearchConfig {
                roots: vec![PathBuf::from("/config/root")],
                use_env_path: true,
            },
            ..TrellisConfig::default()
        };
        let path = config.search_path_with(SearchPath::new(["/env/root"]));
        assert_eq!(
            path.roots(),
            [PathBuf::from("/env/root"), PathBuf::from("/config/root")]
        );
    }

    #[test]
    fn env_path_can_be_disabled() {
        let config = TrellisConfig {
            search: SearchConfig {
                roots: vec![PathBuf::from("/config/root")],
                use_env_path: false,
            },
            ..TrellisConfig::default()
        };
        let path = config.search_path_with(SearchPath::new(["/env/root"]));
        assert_eq!(path.roots(), [PathBuf::from("/config/root")]);
    }
}
