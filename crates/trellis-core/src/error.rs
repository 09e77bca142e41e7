// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Trellis plugin loader.

use thiserror::Error;

/// The primary error type returned by Trellis loaders and configuration.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// Configuration errors (invalid TOML, bad search roots, bad layout).
    #[error("configuration error: {0}")]
    Config(String),

    /// A namespace identifier could not be parsed.
    #[error("invalid namespace `{namespace}`: {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    /// A candidate module was found but failed to load.
    ///
    /// Only surfaced when the loader is configured to fail on import errors;
    /// by default such candidates are dropped.
    #[error("failed to import `{path}`: {source}")]
    Import {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Namespace implication looped back onto a namespace still being expanded.
    #[error("implication cycle: {}", chain.join(" -> "))]
    ImplicationCycle { chain: Vec<String> },

    /// A qualified type name did not resolve to any export.
    #[error("type not found: {name}")]
    TypeNotFound { name: String },

    /// A qualified name resolved to an export that is not a type.
    #[error("`{name}` is not a type")]
    NotAType { name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
