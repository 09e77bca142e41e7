// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loaded code units and the objects they export.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use trellis_core::{NAMESPACE_SEP, Plugin, PluginMeta};

/// Exports whose name starts with this character are private.
pub const PRIVATE_PREFIX: char = '_';

/// Shared handle on an imported module.
pub type ModuleRef = Arc<Module>;

/// Shared handle on a type descriptor.
pub type TypeRef = Arc<TypeDescriptor>;

/// A successfully imported code unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    origin: PathBuf,
    meta: Option<PluginMeta>,
    /// Sorted by export name.
    exports: Vec<Export>,
}

impl Module {
    pub fn new(name: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            meta: None,
            exports: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: PluginMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add or replace an export, keeping exports sorted by name.
    pub fn with_export(mut self, name: impl Into<String>, object: Object) -> Self {
        let name = name.into();
        match self.exports.binary_search_by(|e| e.name.as_str().cmp(&name)) {
            Ok(i) => self.exports[i].object = object,
            Err(i) => self.exports.insert(i, Export { name, object }),
        }
        self
    }

    /// Fully qualified dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the module was read from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn meta(&self) -> Option<&PluginMeta> {
        self.meta.as_ref()
    }

    /// All exports, private ones included, sorted by name.
    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    /// Exports whose name does not start with [`PRIVATE_PREFIX`].
    pub fn public_exports(&self) -> impl Iterator<Item = &Export> {
        self.exports.iter().filter(|e| e.is_public())
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.exports
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.exports[i].object)
    }
}

impl Plugin for Module {
    fn plugin_meta(&self) -> Option<&PluginMeta> {
        self.meta.as_ref()
    }
}

/// A named binding on a module.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name: String,
    pub object: Object,
}

impl Export {
    pub fn is_public(&self) -> bool {
        !self.name.starts_with(PRIVATE_PREFIX)
    }
}

/// The value bound to an export.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Value(Arc<ValueObject>),
    Type(TypeRef),
}

impl Object {
    pub fn qualified_name(&self) -> &str {
        match self {
            Object::Value(v) => &v.qualified_name,
            Object::Type(t) => &t.qualified_name,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Object::Type(_))
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Object::Type(t) => Some(t),
            Object::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&toml::Value> {
        match self {
            Object::Value(v) => Some(&v.value),
            Object::Type(_) => None,
        }
    }
}

impl Plugin for Object {
    fn plugin_meta(&self) -> Option<&PluginMeta> {
        match self {
            Object::Value(v) => v.meta.as_ref(),
            Object::Type(t) => t.meta.as_ref(),
        }
    }
}

/// A plain exported value, optionally carrying its own metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueObject {
    qualified_name: String,
    value: toml::Value,
    meta: Option<PluginMeta>,
}

impl ValueObject {
    pub fn new(qualified_name: impl Into<String>, value: toml::Value) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            value,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Option<PluginMeta>) -> Self {
        self.meta = meta;
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn value(&self) -> &toml::Value {
        &self.value
    }
}

/// An exported type and its resolved base types.
///
/// Types are identified by qualified name, so the same type imported twice
/// compares as one.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    qualified_name: String,
    bases: Vec<TypeRef>,
    meta: Option<PluginMeta>,
}

impl TypeDescriptor {
    pub fn new(qualified_name: impl Into<String>, bases: Vec<TypeRef>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            bases,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Option<PluginMeta>) -> Self {
        self.meta = meta;
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The unqualified type name.
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit_once(NAMESPACE_SEP)
            .map_or(self.qualified_name.as_str(), |(_, name)| name)
    }

    /// Direct base types, in declaration order.
    pub fn bases(&self) -> &[TypeRef] {
        &self.bases
    }

    pub fn meta(&self) -> Option<&PluginMeta> {
        self.meta.as_ref()
    }

    pub fn is_same(&self, other: &TypeDescriptor) -> bool {
        self.qualified_name == other.qualified_name
    }

    /// True if `other` is this type or any of its ancestors.
    pub fn inherits_from(&self, other: &TypeDescriptor) -> bool {
        self.is_same(other) || self.bases.iter().any(|b| b.inherits_from(other))
    }

    /// True if this type strictly derives from `base`; a type is not its own subclass.
    pub fn is_subclass_of(&self, base: &TypeDescriptor) -> bool {
        !self.is_same(base) && self.inherits_from(base)
    }
}

impl Plugin for TypeDescriptor {
    fn plugin_meta(&self) -> Option<&PluginMeta> {
        self.meta.as_ref()
    }
}
