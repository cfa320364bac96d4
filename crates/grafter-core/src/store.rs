//! Installed-version lookups against the local dependency store.

use serde::Deserialize;
use std::path::Path;

/// The subset of installed package metadata we read.
#[derive(Debug, Deserialize)]
struct PackageMeta {
    version: Option<String>,
}

/// Read the installed version of a package, or None if it is not installed.
///
/// The primary probe is `<base_dir>/node_modules/<package>/package.json`;
/// if that misses, the same probe walks up the ancestor directories (hoisted
/// installs land the package higher in the tree). Absence, including any
/// unreadable or malformed metadata file, is a normal outcome rather than an
/// error.
pub fn installed_version(base_dir: &Path, package: &str) -> Option<String> {
    let mut dir = Some(base_dir);
    while let Some(current) = dir {
        if let Some(version) = read_version(current, package) {
            return Some(version);
        }
        dir = current.parent();
    }
    None
}

fn read_version(dir: &Path, package: &str) -> Option<String> {
    let meta_path = dir.join("node_modules").join(package).join("package.json");
    let contents = std::fs::read_to_string(meta_path).ok()?;
    let meta: PackageMeta = serde_json::from_str(&contents).ok()?;
    meta.version
}
