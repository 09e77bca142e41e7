// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::TrellisConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &TrellisConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let layout = &config.layout;

    // Scanner and importer match these strings byte for byte.
    let ext = layout.source_extension.as_str();
    let mut ext_valid = false;
    if ext.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "layout.source_extension must not be empty".to_string(),
        });
    } else if ext.chars().any(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: format!("layout.source_extension `{ext}` must not contain whitespace"),
        });
    } else if ext.contains('.') {
        errors.push(ConfigError::Validation {
            message: format!(
                "layout.source_extension `{ext}` must not contain dots; write `{}`",
                ext.trim_start_matches('.')
            ),
        });
    } else {
        ext_valid = true;
    }

    let marker = &layout.package_marker;
    if marker.contains('/') || marker.contains('\\') {
        errors.push(ConfigError::Validation {
            message: format!("layout.package_marker `{marker}` must be a file name, not a path"),
        });
    } else if marker.chars().any(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: format!("layout.package_marker `{marker}` must not contain whitespace"),
        });
    } else if ext_valid && !marker.ends_with(&format!(".{ext}")) {
        errors.push(ConfigError::Validation {
            message: format!("layout.package_marker `{marker}` must end with `.{ext}`"),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (i, root) in config.search.roots.iter().enumerate() {
        if root.as_os_str().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("search.roots[{i}] must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn messages(config: &TrellisConfig) -> Vec<String> {
        validate_config(config)
            .err()
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&TrellisConfig::default()).is_ok());
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let mut config = TrellisConfig::default();
        config.layout.source_extension = ".toml".into();
        config.layout.package_marker = "mod..toml".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("must not contain dots"));
    }

    #[test]
    fn marker_must_match_extension() {
        let mut config = TrellisConfig::default();
        config.layout.package_marker = "__init__.py".into();
        assert!(messages(&config)[0].contains("must end with `.toml`"));
    }

    #[test]
    fn whitespace_in_layout_is_rejected() {
        let mut config = TrellisConfig::default();
        config.layout.source_extension = " toml".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("must not contain whitespace"));

        let mut config = TrellisConfig::default();
        config.layout.package_marker = "mod.toml ".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("layout.package_marker"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = TrellisConfig::default();
        config.layout.source_extension = String::new();
        config.log.level = "loud".into();
        config.search.roots = vec![PathBuf::from("/ok"), PathBuf::new()];

        let msgs = messages(&config);
        assert_eq!(msgs.len(), 3);
        assert!(msgs.iter().any(|m| m.contains("log.level `loud`")));
        assert!(msgs.iter().any(|m| m.contains("search.roots[1]")));
    }
}
