// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use trellis_core::{ImportErrorPolicy, Layout, Namespace, SearchPath, TrellisError};

use super::Loader;
use crate::import::{CandidateImport, ImportOutcome, Importer};
use crate::manifest::ManifestImporter;
use crate::module::ModuleRef;
use crate::scanner::NamespaceScanner;

/// Loads every module found under a namespace.
#[derive(Clone)]
pub struct ModuleLoader {
    scanner: NamespaceScanner,
    importer: Arc<dyn Importer>,
    policy: ImportErrorPolicy,
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("scanner", &self.scanner)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ModuleLoader {
    pub fn new(scanner: NamespaceScanner, importer: Arc<dyn Importer>) -> Self {
        Self {
            scanner,
            importer,
            policy: ImportErrorPolicy::default(),
        }
    }

    /// A loader backed by [`ManifestImporter`] using the default layout.
    pub fn from_search_path(search_path: SearchPath) -> Self {
        Self::with_layout(search_path, Layout::default())
    }

    /// A loader backed by [`ManifestImporter`] using `layout`.
    pub fn with_layout(search_path: SearchPath, layout: Layout) -> Self {
        let importer = ManifestImporter::new(search_path.clone(), layout.clone());
        Self::new(NamespaceScanner::new(search_path, layout), Arc::new(importer))
    }

    pub fn with_policy(mut self, policy: ImportErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn scanner(&self) -> &NamespaceScanner {
        &self.scanner
    }

    pub fn importer(&self) -> &dyn Importer {
        self.importer.as_ref()
    }

    pub fn policy(&self) -> ImportErrorPolicy {
        self.policy
    }

    /// Scan `namespace` and import every candidate, keeping each outcome.
    pub fn imports(&self, namespace: &Namespace) -> Vec<CandidateImport> {
        self.scanner
            .scan(namespace)
            .map(|candidate| {
                let path = namespace.child(&candidate.name);
                let outcome = ImportOutcome::from(self.importer.import(&path));
                CandidateImport {
                    candidate,
                    path,
                    outcome,
                }
            })
            .collect()
    }

    /// Load the modules of `namespace`, filtered and ordered by their metadata.
    pub fn load(&self, namespace: &str) -> Result<Vec<ModuleRef>, TrellisError> {
        self.load_namespace(&Namespace::parse(namespace)?)
    }
}

impl Loader for ModuleLoader {
    type Item = ModuleRef;

    fn collect(&self, namespace: &Namespace) -> Result<Vec<ModuleRef>, TrellisError> {
        let mut modules = Vec::new();
        for import in self.imports(namespace) {
            match import.outcome {
                ImportOutcome::Loaded(module) => modules.push(module),
                ImportOutcome::NotFound => {
                    trace!(path = %import.path, "candidate vanished before import");
                }
                ImportOutcome::Failed(err) => match self.policy {
                    ImportErrorPolicy::Skip => {
                        debug!(
                            path = %import.path,
                            error = %err,
                            "skipping module that failed to import"
                        );
                    }
                    ImportErrorPolicy::Fail => {
                        return Err(TrellisError::Import {
                            path: import.path,
                            source: Box::new(err),
                        });
                    }
                },
            }
        }
        Ok(modules)
    }
}
