// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin metadata and the trait every loadable candidate implements.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Metadata a plugin attaches to itself under the reserved `plugin` key.
///
/// Every field is optional in the source file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginMeta {
    /// When false, the plugin is dropped from load results.
    #[serde(default = "default_load")]
    pub load: bool,

    /// Namespaces whose plugins are loaded and appended after this one's namespace.
    #[serde(default)]
    pub imply_plugins: Vec<String>,

    /// Sort key for the final ordering; higher values sort first.
    #[serde(default)]
    pub priority: f64,
}

impl Default for PluginMeta {
    fn default() -> Self {
        Self {
            load: default_load(),
            imply_plugins: Vec::new(),
            priority: 0.0,
        }
    }
}

fn default_load() -> bool {
    true
}

/// A candidate the loader pipeline can filter, expand, and order.
pub trait Plugin {
    /// Metadata attached at discovery time, if any.
    fn plugin_meta(&self) -> Option<&PluginMeta>;

    /// Whether the plugin should appear in load results.
    fn should_load(&self) -> bool {
        self.plugin_meta().is_none_or(|m| m.load)
    }

    /// Priority used for ordering. Candidates without metadata sort at `0.0`.
    fn priority(&self) -> f64 {
        self.plugin_meta().map_or(0.0, |m| m.priority)
    }

    /// Namespaces this plugin pulls in.
    fn implied_namespaces(&self) -> &[String] {
        self.plugin_meta()
            .map(|m| m.imply_plugins.as_slice())
            .unwrap_or_default()
    }
}

impl<T: Plugin + ?Sized> Plugin for Arc<T> {
    fn plugin_meta(&self) -> Option<&PluginMeta> {
        (**self).plugin_meta()
    }
}
