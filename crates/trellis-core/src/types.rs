// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the scanner, the loaders, and the configuration layer.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrellisError;

/// Environment variable holding the default search path, in the platform's
/// path-list format (`:`-separated on Unix, `;` on Windows).
pub const SEARCH_PATH_ENV: &str = "TRELLIS_PATH";

/// Separator between namespace segments.
pub const NAMESPACE_SEP: char = '.';

/// A dotted namespace identifier such as `myapp.plugins`.
///
/// Each segment maps to one directory level below a search root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Parse and validate a namespace identifier.
    pub fn parse(namespace: &str) -> Result<Self, TrellisError> {
        let invalid = |reason: String| TrellisError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason,
        };

        if namespace.is_empty() {
            return Err(invalid("must not be empty".to_string()));
        }

        for segment in namespace.split(NAMESPACE_SEP) {
            if segment.is_empty() {
                return Err(invalid("contains an empty segment".to_string()));
            }
            if segment.contains(['/', '\\']) {
                return Err(invalid(format!(
                    "segment `{segment}` contains a path separator"
                )));
            }
        }

        Ok(Self(namespace.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dotted segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAMESPACE_SEP)
    }

    /// The dotted path of a direct child of this namespace.
    pub fn child(&self, name: &str) -> String {
        format!("{}{}{}", self.0, NAMESPACE_SEP, name)
    }

    /// The namespace as a relative directory path (`a.b` -> `a/b`).
    pub fn relative_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Namespace {
    type Error = TrellisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered list of root directories searched for namespaces.
///
/// Earlier roots win when the same candidate name appears in several roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The default search path, read from `TRELLIS_PATH`.
    ///
    /// An unset variable yields an empty search path.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(SEARCH_PATH_ENV).as_deref())
    }

    /// Build a search path from a raw path-list value. Empty entries are ignored.
    pub fn from_env_value(value: Option<&OsStr>) -> Self {
        let roots = value
            .map(|v| {
                std::env::split_paths(v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.roots.iter()
    }

    pub fn push(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Extend<PathBuf> for SearchPath {
    fn extend<T: IntoIterator<Item = PathBuf>>(&mut self, iter: T) {
        self.roots.extend(iter);
    }
}

impl FromIterator<PathBuf> for SearchPath {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

/// On-disk convention for code units.
///
/// A file with `source_extension` is a module; a directory containing
/// `package_marker` is a package whose body is the marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// File extension of module files, without the leading dot.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// File name that marks a directory as a package.
    #[serde(default = "default_package_marker")]
    pub package_marker: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            package_marker: default_package_marker(),
        }
    }
}

impl Layout {
    /// File name of the module called `base`.
    pub fn module_file_name(&self, base: &str) -> String {
        format!("{base}.{}", self.source_extension)
    }

    /// Returns the base name if `file_name` is a module file under this layout.
    ///
    /// The package marker itself is never a module.
    pub fn module_base_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if file_name == self.package_marker {
            return None;
        }
        let path = Path::new(file_name);
        if path.extension().and_then(OsStr::to_str) != Some(self.source_extension.as_str()) {
            return None;
        }
        file_name
            .strip_suffix(self.source_extension.as_str())
            .and_then(|s| s.strip_suffix('.'))
            .filter(|base| !base.is_empty() && !base.contains(NAMESPACE_SEP))
    }

    /// Whether `dir` is a package under this layout.
    pub fn is_package(&self, dir: &Path) -> bool {
        dir.join(&self.package_marker).is_file()
    }
}

fn default_source_extension() -> String {
    "toml".to_string()
}

fn default_package_marker() -> String {
    "mod.toml".to_string()
}

/// What a module loader does with candidates that fail to import.
///
/// Candidates that simply do not exist are always dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportErrorPolicy {
    /// Drop the candidate and continue.
    #[default]
    Skip,
    /// Abort the load with [`TrellisError::Import`].
    Fail,
}

impl fmt::Display for ImportErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportErrorPolicy::Skip => write!(f, "skip"),
            ImportErrorPolicy::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_parse_valid() {
        let ns = Namespace::parse("myapp.plugins").unwrap();
        assert_eq!(ns.as_str(), "myapp.plugins");
        assert_eq!(ns.segments().collect::<Vec<_>>(), vec!["myapp", "plugins"]);
        assert_eq!(ns.relative_path(), PathBuf::from("myapp").join("plugins"));
        assert_eq!(ns.child("foo"), "myapp.plugins.foo");
    }

    #[test]
    fn namespace_rejects_empty_and_bad_segments() {
        for bad in ["", "a..b", ".a", "a.", "a/b", "a.b\\c"] {
            let err = Namespace::parse(bad).unwrap_err();
            assert!(
                matches!(err, TrellisError::InvalidNamespace { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn namespace_serde_validates() {
        let ns: Namespace = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(ns.to_string(), "a.b");
        assert!(serde_json::from_str::<Namespace>("\"a..b\"").is_err());
    }

    #[test]
    fn search_path_from_env_value() {
        let joined = std::env::join_paths(["/one", "/two"]).unwrap();
        let path = SearchPath::from_env_value(Some(&joined));
        assert_eq!(
            path.roots(),
            &[PathBuf::from("/one"), PathBuf::from("/two")]
        );

        assert!(SearchPath::from_env_value(None).is_empty());
        assert!(SearchPath::from_env_value(Some(OsStr::new(""))).is_empty());
    }

    #[test]
    fn search_path_preserves_order() {
        let mut path = SearchPath::new(["/b", "/a"]);
        path.push("/c");
        let roots: Vec<_> = path.iter().cloned().collect();
        assert_eq!(
            roots,
            vec![PathBuf::from("/b"), PathBuf::from("/a"), PathBuf::from("/c")]
        );
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn layout_module_base_name() {
        let layout = Layout::default();
        assert_eq!(layout.module_base_name("alpha.toml"), Some("alpha"));
        assert_eq!(layout.module_base_name("mod.toml"), None);
        assert_eq!(layout.module_base_name("notes.md"), None);
        assert_eq!(layout.module_base_name("noext"), None);
        assert_eq!(layout.module_base_name(".toml"), None);
        assert_eq!(layout.module_base_name("a.b.toml"), None);
        assert_eq!(layout.module_file_name("alpha"), "alpha.toml");
    }

    #[test]
    fn layout_custom_extension() {
        let layout = Layout {
            source_extension: "plugin".into(),
            package_marker: "init.plugin".into(),
        };
        assert_eq!(layout.module_base_name("a.plugin"), Some("a"));
        assert_eq!(layout.module_base_name("init.plugin"), None);
        assert_eq!(layout.module_base_name("a.toml"), None);
    }

    #[test]
    fn import_error_policy_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ImportErrorPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"fail\"").unwrap();
        assert_eq!(w.policy, ImportErrorPolicy::Fail);
        assert_eq!(ImportErrorPolicy::default(), ImportErrorPolicy::Skip);
        assert_eq!(ImportErrorPolicy::Skip.to_string(), "skip");
    }
}
