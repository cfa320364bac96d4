//! Read-only compliance audit of installed versions against a matrix.

use crate::matrix::CompatibilityMatrix;
use crate::report::Reporter;
use crate::store;
use semver::{Version, VersionReq};
use std::path::Path;

/// An installed version that is outside its allowed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    /// Package name.
    pub package: String,
    /// The version currently installed.
    pub current: String,
    /// The full allowed list, for diagnostic display.
    pub allowed: Vec<String>,
}

/// Audit every package in the matrix against the dependency store.
///
/// A package that is not installed is compliant by definition and produces
/// no diagnostic. An installed package passes if its version is an exact
/// member of the allowed list, or if any specifier in the list
/// semver-satisfies it. Nothing is mutated; the discrepancy list is returned
/// for programmatic use.
pub fn check_compliance(
    base_dir: &Path,
    matrix: &CompatibilityMatrix,
    reporter: &dyn Reporter,
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();

    for (package, specifiers) in &matrix.packages {
        let Some(current) = store::installed_version(base_dir, package) else {
            continue;
        };

        let allowed = specifiers.as_slice();
        if satisfies_any(&current, allowed) {
            reporter.pass(package, &current);
        } else {
            reporter.fail(package, &current, allowed);
            discrepancies.push(Discrepancy {
                package: package.clone(),
                current,
                allowed: allowed.to_vec(),
            });
        }
    }

    discrepancies
}

/// Exact membership, or any specifier matching as a semver range.
///
/// A specifier that does not parse as a range only participates in the
/// exact-match half.
pub(crate) fn satisfies_any(installed: &str, allowed: &[String]) -> bool {
    if allowed.iter().any(|spec| spec == installed) {
        return true;
    }

    let Ok(version) = Version::parse(installed) else {
        return false;
    };

    allowed.iter().any(|spec| {
        VersionReq::parse(spec)
            .map(|req| req.matches(&version))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use std::fs;
    use std::path::Path;

    fn install(root: &Path, package: &str, version: &str) {
        let dir = root.join("node_modules").join(package);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(r#"{{ "name": "{package}", "version": "{version}" }}"#),
        )
        .unwrap();
    }

    #[test]
    fn exact_member_passes() {
        assert!(satisfies_any("1.1.0", &["1.0.0".into(), "1.1.0".into()]));
    }

    #[test]
    fn range_satisfaction_passes() {
        assert!(satisfies_any("1.4.2", &["^1.0.0".into()]));
        assert!(!satisfies_any("2.0.0", &["^1.0.0".into()]));
    }

    #[test]
    fn unparseable_specifier_only_matches_exactly() {
        assert!(satisfies_any("next", &["next".into()]));
        assert!(!satisfies_any("1.0.0", &["not a range".into()]));
    }

    #[test]
    fn mixed_matrix_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        install(tmp.path(), "pkg-a", "1.1.0");
        install(tmp.path(), "pkg-b", "1.9.0");

        let matrix = CompatibilityMatrix::parse(
            r#"{ "pkg-a": ["1.0.0", "1.1.0"], "pkg-b": "2.0.0" }"#,
        )
        .unwrap();

        let discrepancies = check_compliance(tmp.path(), &matrix, &NullReporter);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(discrepancies[0].package, "pkg-b");
        assert_eq!(discrepancies[0].current, "1.9.0");
        assert_eq!(discrepancies[0].allowed, ["2.0.0".to_string()]);
    }

    #[test]
    fn absent_packages_never_appear() {
        let tmp = tempfile::tempdir().unwrap();
        let matrix = CompatibilityMatrix::parse(r#"{ "pkg-a": "1.0.0" }"#).unwrap();
        assert!(check_compliance(tmp.path(), &matrix, &NullReporter).is_empty());
    }
}
