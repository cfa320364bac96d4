//! Project manifest parsing and mutation for `package.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed project manifest.
///
/// Only the two dependency tables are modeled; every other field is carried
/// through the flattened remainder map so a rewrite preserves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Regular runtime dependencies.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    /// Development-only dependencies.
    #[serde(
        default,
        rename = "devDependencies",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub dev_dependencies: BTreeMap<String, String>,
    /// All remaining manifest fields, untouched.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Which dependency table a declared package lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyClass {
    /// `dependencies`
    Regular,
    /// `devDependencies`
    Development,
}

/// Errors that can occur when loading or writing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PackageManifest {
    /// Load a manifest from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a manifest from a JSON string.
    pub fn parse(s: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_string(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let contents = self.to_string()?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Look up a declared specifier and the class it belongs to.
    ///
    /// A package declared in both tables resolves to the regular one.
    pub fn declared(&self, package: &str) -> Option<(&str, DependencyClass)> {
        if let Some(spec) = self.dependencies.get(package) {
            return Some((spec.as_str(), DependencyClass::Regular));
        }
        self.dev_dependencies
            .get(package)
            .map(|spec| (spec.as_str(), DependencyClass::Development))
    }

    /// Set the specifier for a package in a given class, inserting if absent.
    pub fn upsert(&mut self, package: &str, specifier: &str, class: DependencyClass) {
        let table = match class {
            DependencyClass::Regular => &mut self.dependencies,
            DependencyClass::Development => &mut self.dev_dependencies,
        };
        table.insert(package.to_string(), specifier.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "demo-app",
        "version": "1.0.0",
        "scripts": { "build": "webpack" },
        "dependencies": { "pkg-a": "^1.0.0" },
        "devDependencies": { "pkg-b": "~2.1.0" }
    }"#;

    #[test]
    fn parse_and_lookup() {
        let manifest = PackageManifest::parse(SAMPLE).unwrap();
        assert_eq!(
            manifest.declared("pkg-a"),
            Some(("^1.0.0", DependencyClass::Regular))
        );
        assert_eq!(
            manifest.declared("pkg-b"),
            Some(("~2.1.0", DependencyClass::Development))
        );
        assert_eq!(manifest.declared("pkg-c"), None);
    }

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let manifest = PackageManifest::parse(SAMPLE).unwrap();
        let out = manifest.to_string().unwrap();
        let back: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back["name"], "demo-app");
        assert_eq!(back["scripts"]["build"], "webpack");
        assert_eq!(back["dependencies"]["pkg-a"], "^1.0.0");
    }

    #[test]
    fn upsert_inserts_and_replaces() {
        let mut manifest = PackageManifest::parse(SAMPLE).unwrap();
        manifest.upsert("pkg-a", "^1.3.0", DependencyClass::Regular);
        manifest.upsert("pkg-c", "3.0.0", DependencyClass::Regular);
        assert_eq!(
            manifest.declared("pkg-a"),
            Some(("^1.3.0", DependencyClass::Regular))
        );
        assert_eq!(
            manifest.declared("pkg-c"),
            Some(("3.0.0", DependencyClass::Regular))
        );
    }

    #[test]
    fn regular_wins_over_development() {
        let mut manifest = PackageManifest::default();
        manifest.upsert("pkg-a", "1.0.0", DependencyClass::Development);
        manifest.upsert("pkg-a", "2.0.0", DependencyClass::Regular);
        assert_eq!(
            manifest.declared("pkg-a"),
            Some(("2.0.0", DependencyClass::Regular))
        );
    }

    #[test]
    fn malformed_manifest() {
        let err = PackageManifest::parse("{ not json").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn empty_tables_not_serialized() {
        let manifest = PackageManifest::default();
        let out = manifest.to_string().unwrap();
        assert!(!out.contains("dependencies"));
    }
}
