//! Compatibility matrix documents and their filename-convention lookup.

use crate::report::Reporter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One or more allowed version specifiers for a package.
///
/// Matrix documents list specifiers in ascending significance order; the
/// last entry is the designated upgrade target. That ordering is a contract
/// of the document format, not something this crate infers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpecifierList {
    /// A single specifier.
    One(String),
    /// An ordered list of specifiers.
    Many(Vec<String>),
}

impl SpecifierList {
    /// View the specifiers as a slice, regardless of document shape.
    pub fn as_slice(&self) -> &[String] {
        match self {
            SpecifierList::One(s) => std::slice::from_ref(s),
            SpecifierList::Many(v) => v.as_slice(),
        }
    }

    /// The highest-ordered entry, which is the upgrade target.
    pub fn target(&self) -> Option<&str> {
        self.as_slice().last().map(String::as_str)
    }
}

/// A loaded compatibility matrix: package name to allowed specifiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompatibilityMatrix {
    #[serde(flatten)]
    pub packages: BTreeMap<String, SpecifierList>,
}

/// Errors that can occur when loading a matrix document.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("failed to read matrix document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse matrix document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CompatibilityMatrix {
    /// Load a matrix from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MatrixError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a matrix from a JSON string.
    pub fn parse(s: &str) -> Result<Self, MatrixError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Merge caller-supplied overrides; overrides win on key collision.
    pub fn merged(mut self, overrides: &BTreeMap<String, SpecifierList>) -> Self {
        for (name, spec) in overrides {
            self.packages.insert(name.clone(), spec.clone());
        }
        self
    }
}

/// Find the matrix document for a (core, companion) version pair.
///
/// The companion version defaults to the core version; post-merge releases
/// keep the two in lockstep. Probes `{companion}-{core}.json` with dots
/// replaced by underscores inside each version, then falls back to the
/// self-paired `{core}-{core}.json`. When both probes miss there is nothing
/// to check against: a formatted error goes through the reporter and the
/// caller gets None.
pub fn locate(
    matrix_dir: &Path,
    core_version: &str,
    companion_version: Option<&str>,
    reporter: &dyn Reporter,
) -> Option<PathBuf> {
    let companion = companion_version.unwrap_or(core_version);

    let candidates = [
        matrix_dir.join(matrix_file_name(companion, core_version)),
        matrix_dir.join(matrix_file_name(core_version, core_version)),
    ];

    for candidate in candidates {
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    reporter.error(&format!(
        "no compatibility matrix for companion {companion} / core {core_version} under {}",
        matrix_dir.display()
    ));
    None
}

fn matrix_file_name(companion: &str, core: &str) -> String {
    format!(
        "{}-{}.json",
        companion.replace('.', "_"),
        core.replace('.', "_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use std::fs;

    #[test]
    fn parse_one_and_many() {
        let matrix = CompatibilityMatrix::parse(
            r#"{ "pkg-a": ["1.0.0", "1.1.0"], "pkg-b": "2.0.0" }"#,
        )
        .unwrap();
        assert_eq!(
            matrix.packages["pkg-a"].as_slice(),
            ["1.0.0".to_string(), "1.1.0".to_string()]
        );
        assert_eq!(matrix.packages["pkg-b"].as_slice(), ["2.0.0".to_string()]);
        assert_eq!(matrix.packages["pkg-a"].target(), Some("1.1.0"));
    }

    #[test]
    fn overrides_win_on_collision() {
        let matrix = CompatibilityMatrix::parse(r#"{ "pkg-a": "1.0.0" }"#).unwrap();
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "pkg-a".to_string(),
            SpecifierList::One("9.9.9".to_string()),
        );
        overrides.insert(
            "pkg-x".to_string(),
            SpecifierList::One("0.1.0".to_string()),
        );

        let merged = matrix.merged(&overrides);
        assert_eq!(merged.packages["pkg-a"].as_slice(), ["9.9.9".to_string()]);
        assert_eq!(merged.packages["pkg-x"].as_slice(), ["0.1.0".to_string()]);
    }

    #[test]
    fn locate_exact_pair() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("2_0_0-2_0_0.json"), "{}").unwrap();

        let found = locate(tmp.path(), "2.0.0", Some("2.0.0"), &NullReporter).unwrap();
        assert_eq!(found.file_name().unwrap(), "2_0_0-2_0_0.json");
    }

    #[test]
    fn locate_falls_back_to_self_paired() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("2_0_0-2_0_0.json"), "{}").unwrap();

        // 2_0_1-2_0_0.json is absent, so the self-paired candidate is used.
        let found = locate(tmp.path(), "2.0.0", Some("2.0.1"), &NullReporter).unwrap();
        assert_eq!(found.file_name().unwrap(), "2_0_0-2_0_0.json");
    }

    #[test]
    fn locate_prefers_exact_pair_over_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("2_0_1-2_0_0.json"), "{}").unwrap();
        fs::write(tmp.path().join("2_0_0-2_0_0.json"), "{}").unwrap();

        let found = locate(tmp.path(), "2.0.0", Some("2.0.1"), &NullReporter).unwrap();
        assert_eq!(found.file_name().unwrap(), "2_0_1-2_0_0.json");
    }

    #[test]
    fn locate_companion_defaults_to_core() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("2_0_0-2_0_0.json"), "{}").unwrap();

        let found = locate(tmp.path(), "2.0.0", None, &NullReporter).unwrap();
        assert_eq!(found.file_name().unwrap(), "2_0_0-2_0_0.json");
    }

    #[test]
    fn locate_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(locate(tmp.path(), "3.0.0", None, &NullReporter).is_none());
    }
}
