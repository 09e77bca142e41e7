// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use trellis_core::{Namespace, SearchPath, TrellisError};

use super::{Loader, ObjectLoader};
use crate::module::{Object, TypeRef};

/// Loads the exported types of a namespace, optionally only the proper
/// subclasses of a base type.
#[derive(Debug, Clone)]
pub struct ClassLoader {
    objects: ObjectLoader,
}

impl ClassLoader {
    pub fn new(objects: ObjectLoader) -> Self {
        Self { objects }
    }

    pub fn from_search_path(search_path: SearchPath) -> Self {
        Self::new(ObjectLoader::from_search_path(search_path))
    }

    pub fn object_loader(&self) -> &ObjectLoader {
        &self.objects
    }

    /// Load the types of `namespace`.
    ///
    /// With `subclasses`, only types that strictly derive from it are kept.
    /// Types pulled in through implied namespaces are filtered by the same
    /// base; they are never returned unfiltered.
    pub fn load(
        &self,
        namespace: &str,
        subclasses: Option<&TypeRef>,
    ) -> Result<Vec<TypeRef>, TrellisError> {
        let namespace = Namespace::parse(namespace)?;
        ClassQuery {
            objects: &self.objects,
            base: subclasses,
        }
        .load_namespace(&namespace)
    }
}

impl Loader for ClassLoader {
    type Item = TypeRef;

    fn collect(&self, namespace: &Namespace) -> Result<Vec<TypeRef>, TrellisError> {
        ClassQuery {
            objects: &self.objects,
            base: None,
        }
        .collect(namespace)
    }
}

/// One class load with a fixed base filter.
struct ClassQuery<'a> {
    objects: &'a ObjectLoader,
    base: Option<&'a TypeRef>,
}

impl Loader for ClassQuery<'_> {
    type Item = TypeRef;

    // Object metadata is not applied on its own here; the pipeline runs once
    // over the surviving types.
    fn collect(&self, namespace: &Namespace) -> Result<Vec<TypeRef>, TrellisError> {
        let objects = self.objects.collect(namespace)?;
        Ok(objects
            .into_iter()
            .filter_map(|object| match object {
                Object::Type(ty) => Some(ty),
                Object::Value(_) => None,
            })
            .filter(|ty| self.base.is_none_or(|base| ty.is_subclass_of(base)))
            .collect())
    }
}
