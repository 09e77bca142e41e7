// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Trellis integration tests.
//!
//! [`PluginTree`] builds a throwaway search root on disk. Writing helpers
//! panic on I/O failure since they only run inside tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trellis_core::{Layout, Namespace, SearchPath};

/// A temporary search root populated with code units.
///
/// The directory is removed when the tree is dropped.
pub struct PluginTree {
    dir: TempDir,
    layout: Layout,
}

impl PluginTree {
    pub fn new() -> Self {
        Self::with_layout(Layout::default())
    }

    pub fn with_layout(layout: Layout) -> Self {
        let dir = tempfile::tempdir().expect("create temp search root");
        Self { dir, layout }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A search path containing only this root.
    pub fn search_path(&self) -> SearchPath {
        SearchPath::new([self.root()])
    }

    /// Write `<namespace>/<name>.<ext>` and return its path.
    pub fn module(&self, namespace: &str, name: &str, body: &str) -> PathBuf {
        let rel = namespace_dir(namespace).join(self.layout.module_file_name(name));
        self.file(rel, body)
    }

    /// Write `<namespace>/<name>/<marker>` and return the package directory.
    pub fn package(&self, namespace: &str, name: &str, body: &str) -> PathBuf {
        let rel = namespace_dir(namespace).join(name);
        self.file(rel.join(&self.layout.package_marker), body);
        self.root().join(rel)
    }

    /// Write an arbitrary file relative to the root, creating parents.
    pub fn file(&self, rel: impl AsRef<Path>, body: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, body).expect("write test file");
        path
    }

    /// Create an empty directory relative to the root.
    pub fn dir(&self, rel: impl AsRef<Path>) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).expect("create directory");
        path
    }
}

impl Default for PluginTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A search path over several trees, in the given order.
pub fn search_path(trees: &[&PluginTree]) -> SearchPath {
    SearchPath::new(trees.iter().map(|t| t.root()))
}

fn namespace_dir(namespace: &str) -> PathBuf {
    Namespace::parse(namespace)
        .expect("valid test namespace")
        .relative_path()
}
