// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use trellis_core::{Namespace, SearchPath, TrellisError};

use super::{Loader, ModuleLoader};
use crate::module::Object;

/// Loads the public exports of every module in a namespace as one flat list.
///
/// Modules are loaded, filtered and ordered first; each export is then
/// filtered and ordered again by its own metadata.
#[derive(Debug, Clone)]
pub struct ObjectLoader {
    modules: ModuleLoader,
}

impl ObjectLoader {
    pub fn new(modules: ModuleLoader) -> Self {
        Self { modules }
    }

    pub fn from_search_path(search_path: SearchPath) -> Self {
        Self::new(ModuleLoader::from_search_path(search_path))
    }

    pub fn module_loader(&self) -> &ModuleLoader {
        &self.modules
    }

    pub fn load(&self, namespace: &str) -> Result<Vec<Object>, TrellisError> {
        self.load_namespace(&Namespace::parse(namespace)?)
    }
}

impl Loader for ObjectLoader {
    type Item = Object;

    fn collect(&self, namespace: &Namespace) -> Result<Vec<Object>, TrellisError> {
        let modules = self.modules.load_namespace(namespace)?;
        Ok(modules
            .iter()
            .flat_map(|module| module.public_exports())
            .map(|export| export.object.clone())
            .collect())
    }
}
