// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML code units and the default file-backed importer.
//!
//! A code unit declares optional module metadata under `[plugin]` and its
//! exports under `[exports.<name>]`:
//!
//! ```toml
//! [plugin]
//! priority = 5.0
//! imply_plugins = ["other.ns"]
//!
//! [exports.answer]
//! kind = "value"
//! value = 42
//!
//! [exports.Base]
//! kind = "type"
//!
//! [exports.Derived]
//! kind = "type"
//! bases = ["Base", "other.module.Mixin"]
//!
//! [exports.Derived.plugin]
//! load = false
//! ```
//!
//! Bases without a dot refer to types in the same unit; dotted bases import
//! the named module first.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use trellis_core::{Layout, NAMESPACE_SEP, Namespace, PluginMeta, SearchPath};

use crate::import::{ImportError, Importer};
use crate::module::{Module, ModuleRef, Object, TypeDescriptor, TypeRef, ValueObject};

/// Top-level structure of a code unit.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitFile {
    #[serde(default)]
    plugin: Option<PluginMeta>,
    #[serde(default)]
    exports: BTreeMap<String, ExportSection>,
}

/// One `[exports.<name>]` table.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ExportSection {
    Value {
        value: toml::Value,
        #[serde(default)]
        plugin: Option<PluginMeta>,
    },
    Type {
        #[serde(default)]
        bases: Vec<String>,
        #[serde(default)]
        plugin: Option<PluginMeta>,
    },
}

/// Imports TOML code units from a [`SearchPath`].
///
/// For `a.b.c` each root is checked for the package `a/b/c/<marker>` and then
/// the module `a/b/c.<ext>`; the first match wins. Nothing is cached between
/// imports.
#[derive(Debug, Clone, Default)]
pub struct ManifestImporter {
    search_path: SearchPath,
    layout: Layout,
}

impl ManifestImporter {
    pub fn new(search_path: SearchPath, layout: Layout) -> Self {
        Self {
            search_path,
            layout,
        }
    }

    /// Find the file backing `path`, if any root provides it.
    pub fn locate(&self, path: &str) -> Option<PathBuf> {
        let namespace = Namespace::parse(path).ok()?;
        let mut segments: Vec<&str> = namespace.segments().collect();
        let base = segments.pop()?;
        let parent: PathBuf = segments.into_iter().collect();

        self.search_path.iter().find_map(|root| {
            let dir = root.join(&parent);
            let package = dir.join(base).join(&self.layout.package_marker);
            if package.is_file() {
                return Some(package);
            }
            let module = dir.join(self.layout.module_file_name(base));
            module.is_file().then_some(module)
        })
    }

    fn import_with(&self, path: &str, stack: &mut Vec<String>) -> Result<ModuleRef, ImportError> {
        if stack.iter().any(|p| p == path) {
            let mut chain = stack.clone();
            chain.push(path.to_string());
            return Err(ImportError::Invalid {
                path: path.to_string(),
                reason: format!("import cycle: {}", chain.join(" -> ")),
            });
        }

        let file = self.locate(path).ok_or_else(|| ImportError::NotFound {
            path: path.to_string(),
        })?;

        let content = std::fs::read_to_string(&file).map_err(|source| ImportError::Io {
            path: path.to_string(),
            file: file.clone(),
            source,
        })?;

        stack.push(path.to_string());
        let module = parse_unit(self, path, &file, &content, stack);
        stack.pop();
        module.map(Arc::new)
    }
}

impl Importer for ManifestImporter {
    fn import(&self, path: &str) -> Result<ModuleRef, ImportError> {
        self.import_with(path, &mut Vec::new())
    }
}

/// Parse the contents of a code unit into a [`Module`].
fn parse_unit(
    importer: &ManifestImporter,
    path: &str,
    file: &Path,
    content: &str,
    stack: &mut Vec<String>,
) -> Result<Module, ImportError> {
    let unit: UnitFile = toml::from_str(content).map_err(|e| ImportError::Invalid {
        path: path.to_string(),
        reason: e.message().to_string(),
    })?;

    let mut resolver = TypeResolver {
        importer,
        module_path: path,
        sections: &unit.exports,
        resolved: HashMap::new(),
        in_progress: Vec::new(),
        stack,
    };

    let mut module = Module::new(path, file);
    if let Some(meta) = unit.plugin.clone() {
        module = module.with_meta(meta);
    }

    for (name, section) in &unit.exports {
        let object = match section {
            ExportSection::Value { value, plugin } => Object::Value(Arc::new(
                ValueObject::new(qualify(path, name), value.clone()).with_meta(plugin.clone()),
            )),
            ExportSection::Type { .. } => Object::Type(resolver.resolve_local(name)?),
        };
        module = module.with_export(name.clone(), object);
    }

    Ok(module)
}

fn qualify(module_path: &str, name: &str) -> String {
    format!("{module_path}{NAMESPACE_SEP}{name}")
}

/// Resolves the type exports of one unit, following bases depth-first.
struct TypeResolver<'a> {
    importer: &'a ManifestImporter,
    module_path: &'a str,
    sections: &'a BTreeMap<String, ExportSection>,
    resolved: HashMap<String, TypeRef>,
    in_progress: Vec<String>,
    stack: &'a mut Vec<String>,
}

impl TypeResolver<'_> {
    fn invalid(&self, reason: String) -> ImportError {
        ImportError::Invalid {
            path: self.module_path.to_string(),
            reason,
        }
    }

    fn resolve_local(&mut self, name: &str) -> Result<TypeRef, ImportError> {
        if let Some(ty) = self.resolved.get(name) {
            return Ok(ty.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            let mut chain = self.in_progress.clone();
            chain.push(name.to_string());
            return Err(self.invalid(format!("inheritance cycle: {}", chain.join(" -> "))));
        }

        let sections = self.sections;
        let (bases, plugin) = match sections.get(name) {
            Some(ExportSection::Type { bases, plugin }) => (bases, plugin),
            Some(ExportSection::Value { .. }) => {
                return Err(self.invalid(format!("base `{name}` is not a type")));
            }
            None => return Err(self.invalid(format!("unknown base `{name}`"))),
        };

        self.in_progress.push(name.to_string());
        let resolved: Result<Vec<TypeRef>, ImportError> = bases
            .iter()
            .map(|base| {
                if base.contains(NAMESPACE_SEP) {
                    self.resolve_external(base)
                } else {
                    self.resolve_local(base)
                }
            })
            .collect();
        self.in_progress.pop();

        let ty = Arc::new(
            TypeDescriptor::new(qualify(self.module_path, name), resolved?)
                .with_meta(plugin.clone()),
        );
        self.resolved.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    fn resolve_external(&mut self, qualified: &str) -> Result<TypeRef, ImportError> {
        let Some((module_path, name)) = qualified.rsplit_once(NAMESPACE_SEP) else {
            return Err(self.invalid(format!("unknown base `{qualified}`")));
        };
        if module_path == self.module_path {
            return self.resolve_local(name);
        }

        let module = self
            .importer
            .import_with(module_path, self.stack)
            .map_err(|e| self.invalid(format!("base `{qualified}`: {e}")))?;

        match module.get(name) {
            Some(Object::Type(ty)) => Ok(ty.clone()),
            Some(Object::Value(_)) => {
                Err(self.invalid(format!("base `{qualified}` is not a type")))
            }
            None => Err(self.invalid(format!("unknown base `{qualified}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Plugin;
    use trellis_test_utils::PluginTree;

    fn importer(tree: &PluginTree) -> ManifestImporter {
        ManifestImporter::new(tree.search_path(), Layout::default())
    }

    #[test]
    fn imports_values_types_and_metadata() {
        let tree = PluginTree::new();
        tree.module(
            "testplugin",
            "classes",
            r#"
[plugin]
priority = 2.0

[exports.A]
kind = "type"

[exports.A1]
kind = "type"
bases = ["A"]

[exports.A1.plugin]
priority = 9

[exports.answer]
kind = "value"
value = 42
"#,
        );

        let module = importer(&tree).import("testplugin.classes").unwrap();
        assert_eq!(module.name(), "testplugin.classes");
        assert_eq!(module.priority(), 2.0);

        let a = module.get("A").and_then(Object::as_type).unwrap();
        let a1 = module.get("A1").and_then(Object::as_type).unwrap();
        assert_eq!(a1.qualified_name(), "testplugin.classes.A1");
        assert!(a1.is_subclass_of(a));
        assert_eq!(a1.priority(), 9.0);
        assert_eq!(
            module.get("answer").and_then(Object::as_value),
            Some(&toml::Value::Integer(42))
        );
    }

    #[test]
    fn bases_declared_after_use_resolve() {
        let tree = PluginTree::new();
        tree.module(
            "ns",
            "m",
            r#"
[exports.AChild]
kind = "type"
bases = ["ZBase"]

[exports.ZBase]
kind = "type"
"#,
        );
        let module = importer(&tree).import("ns.m").unwrap();
        let child = module.get("AChild").and_then(Object::as_type).unwrap();
        let base = module.get("ZBase").and_then(Object::as_type).unwrap();
        assert!(child.is_subclass_of(base));
        assert!(Arc::ptr_eq(&child.bases()[0], base));
    }

    #[test]
    fn cross_module_base() {
        let tree = PluginTree::new();
        tree.module("ns", "base", "[exports.Root]\nkind = \"type\"\n");
        tree.module(
            "ns",
            "derived",
            "[exports.Leaf]\nkind = \"type\"\nbases = [\"ns.base.Root\"]\n",
        );

        let imp = importer(&tree);
        let root = crate::import::resolve_type(&imp, "ns.base.Root").unwrap();
        let module = imp.import("ns.derived").unwrap();
        let leaf = module.get("Leaf").and_then(Object::as_type).unwrap();
        assert!(leaf.is_subclass_of(&root));
    }

    #[test]
    fn package_marker_is_package_body() {
        let tree = PluginTree::new();
        tree.package("ns", "pkg", "[plugin]\npriority = 1.5\n");
        let module = importer(&tree).import("ns.pkg").unwrap();
        assert_eq!(module.priority(), 1.5);
        assert!(module.origin().ends_with("mod.toml"));
    }

    #[test]
    fn missing_module_is_not_found() {
        let tree = PluginTree::new();
        let err = importer(&tree).import("ns.absent").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), "ns.absent");
    }

    #[test]
    fn invalid_units() {
        let tree = PluginTree::new();
        tree.module("ns", "syntax", "this is not toml");
        tree.module("ns", "kind", "[exports.x]\nkind = \"function\"\n");
        tree.module("ns", "unknown_base", "[exports.T]\nkind = \"type\"\nbases = [\"Nope\"]\n");
        tree.module(
            "ns",
            "value_base",
            "[exports.v]\nkind = \"value\"\nvalue = 1\n[exports.T]\nkind = \"type\"\nbases = [\"v\"]\n",
        );
        tree.module(
            "ns",
            "cycle",
            "[exports.A]\nkind = \"type\"\nbases = [\"B\"]\n[exports.B]\nkind = \"type\"\nbases = [\"A\"]\n",
        );
        tree.module("ns", "extra", "[metadata]\nx = 1\n");

        let imp = importer(&tree);
        for name in ["syntax", "kind", "unknown_base", "value_base", "cycle", "extra"] {
            let err = imp.import(&format!("ns.{name}")).unwrap_err();
            assert!(
                matches!(err, ImportError::Invalid { .. }),
                "ns.{name} should be invalid, got {err:?}"
            );
        }

        let err = imp.import("ns.cycle").unwrap_err();
        assert!(err.to_string().contains("inheritance cycle"));
    }

    #[test]
    fn cross_module_cycle_is_invalid() {
        let tree = PluginTree::new();
        tree.module("ns", "one", "[exports.A]\nkind = \"type\"\nbases = [\"ns.two.B\"]\n");
        tree.module("ns", "two", "[exports.B]\nkind = \"type\"\nbases = [\"ns.one.A\"]\n");

        let err = importer(&tree).import("ns.one").unwrap_err();
        assert!(matches!(err, ImportError::Invalid { .. }));
        assert!(err.to_string().contains("import cycle"));
    }

    #[test]
    fn first_root_wins() {
        let first = PluginTree::new();
        let second = PluginTree::new();
        first.module("ns", "m", "[plugin]\npriority = 1.0\n");
        second.module("ns", "m", "[plugin]\npriority = 2.0\n");

        let imp = ManifestImporter::new(
            trellis_test_utils::search_path(&[&first, &second]),
            Layout::default(),
        );
        assert_eq!(imp.import("ns.m").unwrap().priority(), 1.0);
    }
}
