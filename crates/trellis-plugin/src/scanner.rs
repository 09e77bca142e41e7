// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespace scanning across an ordered list of search roots.
//!
//! The scanner only looks at names on disk. It never reads a code unit, so a
//! candidate may still fail to import later.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use trellis_core::{Layout, Namespace, SearchPath};

/// Whether a candidate is a single module file or a package directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Module,
    Package,
}

/// A code unit discovered under a namespace but not yet imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Base name: the file name without extension, or the package directory name.
    pub name: String,
    /// Path of the entry relative to `root`.
    pub relative_path: PathBuf,
    /// Search root the candidate was found in.
    pub root: PathBuf,
    pub kind: CandidateKind,
}

impl Candidate {
    /// Absolute location of the module file or package directory.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.relative_path)
    }
}

/// Enumerates candidates for a namespace across a [`SearchPath`].
#[derive(Debug, Clone, Default)]
pub struct NamespaceScanner {
    search_path: SearchPath,
    layout: Layout,
}

impl NamespaceScanner {
    pub fn new(search_path: SearchPath, layout: Layout) -> Self {
        Self {
            search_path,
            layout,
        }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Lazily enumerate the candidates of `namespace`.
    ///
    /// Roots are visited in order and a base name is yielded at most once, from
    /// the first root exposing it. A namespace absent from every root yields
    /// nothing.
    pub fn scan(&self, namespace: &Namespace) -> Scan<'_> {
        Scan {
            scanner: self,
            relative: namespace.relative_path(),
            roots: self.search_path.iter(),
            pending: Vec::new().into_iter(),
            seen: HashSet::new(),
        }
    }

    /// List the qualifying entries of one root, sorted by file name.
    fn list_root(&self, root: &Path, relative: &Path) -> Vec<Candidate> {
        let dir = root.join(relative);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable namespace directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|file_name| {
                let path = dir.join(&file_name);
                let (name, kind) = if path.is_dir() {
                    if file_name.contains('.') || !self.layout.is_package(&path) {
                        return None;
                    }
                    (file_name.clone(), CandidateKind::Package)
                } else {
                    let base = self.layout.module_base_name(&file_name)?;
                    (base.to_string(), CandidateKind::Module)
                };
                Some(Candidate {
                    name,
                    relative_path: relative.join(&file_name),
                    root: root.to_path_buf(),
                    kind,
                })
            })
            .collect()
    }
}

/// Iterator returned by [`NamespaceScanner::scan`].
pub struct Scan<'a> {
    scanner: &'a NamespaceScanner,
    relative: PathBuf,
    roots: std::slice::Iter<'a, PathBuf>,
    pending: std::vec::IntoIter<Candidate>,
    seen: HashSet<String>,
}

impl Iterator for Scan<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.next() {
                if self.seen.insert(candidate.name.clone()) {
                    trace!(
                        name = %candidate.name,
                        root = %candidate.root.display(),
                        "found candidate"
                    );
                    return Some(candidate);
                }
                continue;
            }
            let root = self.roots.next()?;
            self.pending = self.scanner.list_root(root, &self.relative).into_iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_test_utils::PluginTree;

    fn names(scanner: &NamespaceScanner, ns: &str) -> Vec<String> {
        scanner
            .scan(&Namespace::parse(ns).unwrap())
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn finds_modules_and_packages() {
        let tree = PluginTree::new();
        tree.module("testplugin", "alpha", "");
        tree.package("testplugin", "beta", "");
        tree.file("testplugin/notes.md", "ignored");
        tree.file("testplugin/mod.toml", "");
        tree.dir("testplugin/not_a_package");

        let scanner = NamespaceScanner::new(tree.search_path(), Layout::default());
        assert_eq!(names(&scanner, "testplugin"), vec!["alpha", "beta"]);
    }

    #[test]
    fn missing_namespace_is_empty() {
        let tree = PluginTree::new();
        let scanner = NamespaceScanner::new(tree.search_path(), Layout::default());
        assert!(names(&scanner, "nothing.here").is_empty());

        let scanner = NamespaceScanner::default();
        assert!(names(&scanner, "testplugin").is_empty());
    }

    #[test]
    fn earlier_root_wins_on_duplicate_name() {
        let first = PluginTree::new();
        let second = PluginTree::new();
        first.module("testplugin", "shared", "");
        second.module("testplugin", "shared", "");
        second.module("testplugin", "extra", "");

        let search_path = trellis_test_utils::search_path(&[&first, &second]);
        let scanner = NamespaceScanner::new(search_path, Layout::default());
        let candidates: Vec<Candidate> = scanner
            .scan(&Namespace::parse("testplugin").unwrap())
            .collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "shared");
        assert_eq!(candidates[0].root, first.root());
        assert_eq!(candidates[1].name, "extra");
        assert_eq!(candidates[1].root, second.root());
    }

    #[test]
    fn package_shadows_module_of_same_name() {
        let tree = PluginTree::new();
        tree.module("testplugin", "dual", "");
        tree.package("testplugin", "dual", "");

        let scanner = NamespaceScanner::new(tree.search_path(), Layout::default());
        let candidates: Vec<Candidate> = scanner
            .scan(&Namespace::parse("testplugin").unwrap())
            .collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Package);
    }

    #[test]
    fn nested_namespace_and_relative_path() {
        let tree = PluginTree::new();
        let file = tree.module("app.plugins", "gamma", "");

        let scanner = NamespaceScanner::new(tree.search_path(), Layout::default());
        let candidate = scanner
            .scan(&Namespace::parse("app.plugins").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            candidate.relative_path,
            PathBuf::from("app").join("plugins").join("gamma.toml")
        );
        assert_eq!(candidate.path(), file);
    }

    #[test]
    fn custom_layout() {
        let tree = PluginTree::new();
        tree.file("ns/one.plugin", "");
        tree.file("ns/two.toml", "");
        tree.file("ns/pkg/init.plugin", "");

        let layout = Layout {
            source_extension: "plugin".into(),
            package_marker: "init.plugin".into(),
        };
        let scanner = NamespaceScanner::new(tree.search_path(), layout);
        assert_eq!(names(&scanner, "ns"), vec!["one", "pkg"]);
    }
}
