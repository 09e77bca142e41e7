// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module, object, and class loaders over a shared filter/imply/order pipeline.
//!
//! Every loader gathers raw candidates for a namespace with
//! [`Loader::collect`]. [`Loader::load_namespace`] then runs the same pipeline
//! for all of them:
//!
//! 1. candidates whose metadata sets `load = false` are dropped;
//! 2. each namespace named in `imply_plugins` is loaded through the same
//!    loader and appended after the original candidates;
//! 3. the result is stably sorted by priority, highest first.

mod class;
mod module;
mod object;

pub use class::ClassLoader;
pub use module::ModuleLoader;
pub use object::ObjectLoader;

use tracing::debug;
use trellis_core::{Namespace, Plugin, SearchPath, TrellisError};

use crate::module::{ModuleRef, TypeRef};

/// Shared behavior of all loaders.
pub trait Loader {
    type Item: Plugin;

    /// Gather the raw candidates of one namespace, before filtering and ordering.
    fn collect(&self, namespace: &Namespace) -> Result<Vec<Self::Item>, TrellisError>;

    /// Collect, filter, expand implications, and order the plugins of `namespace`.
    ///
    /// Fails with [`TrellisError::ImplicationCycle`] if an implication chain
    /// leads back to a namespace that is still being expanded.
    fn load_namespace(&self, namespace: &Namespace) -> Result<Vec<Self::Item>, TrellisError> {
        let mut trail = Vec::new();
        expand(self, namespace, &mut trail)
    }
}

fn expand<L: Loader + ?Sized>(
    loader: &L,
    namespace: &Namespace,
    trail: &mut Vec<Namespace>,
) -> Result<Vec<L::Item>, TrellisError> {
    if let Some(start) = trail.iter().position(|ns| ns == namespace) {
        let mut chain: Vec<String> = trail[start..].iter().map(ToString::to_string).collect();
        chain.push(namespace.to_string());
        return Err(TrellisError::ImplicationCycle { chain });
    }

    trail.push(namespace.clone());
    let expanded = loader
        .collect(namespace)
        .and_then(|collected| filter_and_imply(loader, collected, trail));
    trail.pop();

    let mut plugins = expanded?;
    order(&mut plugins);
    debug!(namespace = %namespace, count = plugins.len(), "loaded namespace");
    Ok(plugins)
}

/// Build the filtered list with implied namespaces appended, in traversal order.
///
/// A plugin excluded by `load = false` still contributes its implications.
fn filter_and_imply<L: Loader + ?Sized>(
    loader: &L,
    collected: Vec<L::Item>,
    trail: &mut Vec<Namespace>,
) -> Result<Vec<L::Item>, TrellisError> {
    let mut kept = Vec::with_capacity(collected.len());
    let mut implied = Vec::new();

    for plugin in collected {
        for name in plugin.implied_namespaces() {
            let namespace = Namespace::parse(name)?;
            debug!(namespace = %namespace, "expanding implied namespace");
            implied.extend(expand(loader, &namespace, trail)?);
        }
        if plugin.should_load() {
            kept.push(plugin);
        }
    }

    kept.extend(implied);
    Ok(kept)
}

/// Stable sort by priority, highest first.
fn order<P: Plugin>(plugins: &mut [P]) {
    plugins.sort_by(|a, b| sort_key(b.priority()).total_cmp(&sort_key(a.priority())));
}

/// `-0.0` and `0.0` are the same priority.
fn sort_key(priority: f64) -> f64 {
    if priority == 0.0 { 0.0 } else { priority }
}

/// Result of [`unified_load`].
#[derive(Debug, Clone, PartialEq)]
pub enum Plugins {
    Modules(Vec<ModuleRef>),
    Classes(Vec<TypeRef>),
}

impl Plugins {
    pub fn len(&self) -> usize {
        match self {
            Plugins::Modules(m) => m.len(),
            Plugins::Classes(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load `namespace` from `search_path` with the default manifest host.
///
/// With a base type this returns its proper subclasses through a
/// [`ClassLoader`]; otherwise it returns modules through a [`ModuleLoader`].
pub fn unified_load(
    search_path: &SearchPath,
    namespace: &str,
    subclasses: Option<&TypeRef>,
) -> Result<Plugins, TrellisError> {
    let modules = ModuleLoader::from_search_path(search_path.clone());
    match subclasses {
        Some(base) => ClassLoader::new(ObjectLoader::new(modules))
            .load(namespace, Some(base))
            .map(Plugins::Classes),
        None => modules.load(namespace).map(Plugins::Modules),
    }
}
