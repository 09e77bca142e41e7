// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery and loading for Trellis.
//!
//! A plugin namespace is a dotted name such as `myapp.plugins`. Every search
//! root may contribute code units to it: single module files
//! (`myapp/plugins/foo.toml`) or packages (`myapp/plugins/bar/mod.toml`).
//!
//! Three loaders sit on top of the scanner:
//!
//! - [`ModuleLoader`] imports every candidate module;
//! - [`ObjectLoader`] flattens the public exports of those modules;
//! - [`ClassLoader`] keeps only exported types, optionally the proper
//!   subclasses of a base type.
//!
//! All of them honor per-plugin [`PluginMeta`](trellis_core::PluginMeta):
//! `load = false` excludes a plugin, `imply_plugins` pulls in other
//! namespaces, and `priority` orders the result highest first.
//!
//! ```no_run
//! use trellis_core::SearchPath;
//! use trellis_plugin::ModuleLoader;
//!
//! let loader = ModuleLoader::from_search_path(SearchPath::from_env());
//! for module in loader.load("myapp.plugins")? {
//!     println!("{}", module.name());
//! }
//! # Ok::<(), trellis_core::TrellisError>(())
//! ```

pub mod import;
pub mod loaders;
pub mod manifest;
pub mod module;
pub mod scanner;

pub use import::{CandidateImport, ImportError, ImportOutcome, Importer, resolve_type};
pub use loaders::{ClassLoader, Loader, ModuleLoader, ObjectLoader, Plugins, unified_load};
pub use manifest::ManifestImporter;
pub use module::{Export, Module, ModuleRef, Object, TypeDescriptor, TypeRef, ValueObject};
pub use scanner::{Candidate, CandidateKind, NamespaceScanner};
