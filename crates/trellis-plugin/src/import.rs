// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The import capability consumed by the module loader.

use std::path::PathBuf;

use thiserror::Error;
use trellis_core::{NAMESPACE_SEP, TrellisError};

use crate::module::{ModuleRef, Object, TypeRef};
use crate::scanner::Candidate;

/// Resolves a dotted module path to a loaded module.
///
/// Implementations must be safe to share between threads; loaders hold them
/// behind an `Arc`.
pub trait Importer: Send + Sync {
    fn import(&self, path: &str) -> Result<ModuleRef, ImportError>;
}

impl<F> Importer for F
where
    F: Fn(&str) -> Result<ModuleRef, ImportError> + Send + Sync,
{
    fn import(&self, path: &str) -> Result<ModuleRef, ImportError> {
        self(path)
    }
}

/// Why a module could not be imported.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No search root provides the module.
    #[error("module `{path}` not found")]
    NotFound { path: String },

    /// The module file exists but could not be read.
    #[error("failed to read module `{path}` from {}: {source}", file.display())]
    Io {
        path: String,
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module was read but its contents are not a valid code unit.
    #[error("invalid module `{path}`: {reason}")]
    Invalid { path: String, reason: String },
}

impl ImportError {
    /// The dotted path that failed to import.
    pub fn path(&self) -> &str {
        match self {
            ImportError::NotFound { path }
            | ImportError::Io { path, .. }
            | ImportError::Invalid { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ImportError::NotFound { .. })
    }
}

/// Result of importing a single candidate.
#[derive(Debug)]
pub enum ImportOutcome {
    Loaded(ModuleRef),
    NotFound,
    Failed(ImportError),
}

impl From<Result<ModuleRef, ImportError>> for ImportOutcome {
    fn from(result: Result<ModuleRef, ImportError>) -> Self {
        match result {
            Ok(module) => ImportOutcome::Loaded(module),
            Err(e) if e.is_not_found() => ImportOutcome::NotFound,
            Err(e) => ImportOutcome::Failed(e),
        }
    }
}

/// A scanned candidate paired with the outcome of importing it.
#[derive(Debug)]
pub struct CandidateImport {
    pub candidate: Candidate,
    /// Dotted path the candidate was imported as.
    pub path: String,
    pub outcome: ImportOutcome,
}

/// Import the module holding `qualified_name` and return the type it exports.
///
/// `qualified_name` is `module.path.TypeName`.
pub fn resolve_type(
    importer: &dyn Importer,
    qualified_name: &str,
) -> Result<TypeRef, TrellisError> {
    let not_found = || TrellisError::TypeNotFound {
        name: qualified_name.to_string(),
    };

    let (module_path, name) = qualified_name
        .rsplit_once(NAMESPACE_SEP)
        .ok_or_else(not_found)?;

    let module = importer.import(module_path).map_err(|e| {
        if e.is_not_found() {
            not_found()
        } else {
            TrellisError::Import {
                path: module_path.to_string(),
                source: Box::new(e),
            }
        }
    })?;

    match module.get(name) {
        Some(Object::Type(t)) => Ok(t.clone()),
        Some(Object::Value(_)) => Err(TrellisError::NotAType {
            name: qualified_name.to_string(),
        }),
        None => Err(not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Module, TypeDescriptor, ValueObject};
    use std::sync::Arc;

    fn fixed_importer(path: &str) -> Result<ModuleRef, ImportError> {
        match path {
            "ns.classes" => Ok(Arc::new(
                Module::new("ns.classes", "/virtual/classes.toml")
                    .with_export(
                        "A",
                        Object::Type(Arc::new(TypeDescriptor::new("ns.classes.A", vec![]))),
                    )
                    .with_export(
                        "value",
                        Object::Value(Arc::new(ValueObject::new(
                            "ns.classes.value",
                            toml::Value::Boolean(true),
                        ))),
                    ),
            )),
            "ns.broken" => Err(ImportError::Invalid {
                path: path.to_string(),
                reason: "bad".into(),
            }),
            _ => Err(ImportError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    #[test]
    fn resolve_type_finds_exported_type() {
        let ty = resolve_type(&fixed_importer, "ns.classes.A").unwrap();
        assert_eq!(ty.qualified_name(), "ns.classes.A");
    }

    #[test]
    fn resolve_type_errors() {
        assert!(matches!(
            resolve_type(&fixed_importer, "ns.classes.value"),
            Err(TrellisError::NotAType { .. })
        ));
        assert!(matches!(
            resolve_type(&fixed_importer, "ns.classes.Missing"),
            Err(TrellisError::TypeNotFound { .. })
        ));
        assert!(matches!(
            resolve_type(&fixed_importer, "ns.absent.A"),
            Err(TrellisError::TypeNotFound { .. })
        ));
        assert!(matches!(
            resolve_type(&fixed_importer, "Unqualified"),
            Err(TrellisError::TypeNotFound { .. })
        ));
        assert!(matches!(
            resolve_type(&fixed_importer, "ns.broken.A"),
            Err(TrellisError::Import { .. })
        ));
    }

    #[test]
    fn outcome_classification() {
        assert!(matches!(
            ImportOutcome::from(fixed_importer("ns.classes")),
            ImportOutcome::Loaded(_)
        ));
        assert!(matches!(
            ImportOutcome::from(fixed_importer("ns.nope")),
            ImportOutcome::NotFound
        ));
        assert!(matches!(
            ImportOutcome::from(fixed_importer("ns.broken")),
            ImportOutcome::Failed(ImportError::Invalid { .. })
        ));
    }
}
