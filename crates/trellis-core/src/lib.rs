// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Trellis plugin loader.
//!
//! This crate provides the error type, namespace identifiers, plugin metadata,
//! and search path types shared by the loader and configuration crates.

pub mod error;
pub mod meta;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TrellisError;
pub use meta::{Plugin, PluginMeta};
pub use types::{
    ImportErrorPolicy, Layout, NAMESPACE_SEP, Namespace, SEARCH_PATH_ENV, SearchPath,
};
