//! Command implementations.

pub mod check;
pub mod latest;
pub mod upgrade;

use crate::reporter::ConsoleReporter;
use grafter_core::{
    installed_version, locate, CompatibilityMatrix, SpecifierList, UserConfig,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Resolve the compatibility matrix for a project, merged with any
/// command-line overrides. Returns the matrix and the installed core
/// version, or None after printing a diagnostic; a missing prerequisite or
/// missing matrix document aborts the operation without terminating the
/// process.
fn resolve_matrix(
    dir: &Path,
    config: &UserConfig,
    overrides: &[(String, String)],
) -> Option<(CompatibilityMatrix, String)> {
    let core = &config.packages.core;

    let Some(core_version) = installed_version(dir, core) else {
        eprintln!("error: {core} is not installed; install it before checking");
        return None;
    };
    let companion_version = installed_version(dir, &config.packages.companion);

    let Some(matrix_dir) = grafter_core::matrix_dir(dir, core) else {
        eprintln!("error: {core}@{core_version} ships no version matrix");
        return None;
    };

    let path = locate(
        &matrix_dir,
        &core_version,
        companion_version.as_deref(),
        &ConsoleReporter,
    )?;

    let matrix = match CompatibilityMatrix::from_path(&path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return None;
        }
    };

    Some((matrix.merged(&override_map(overrides)), core_version))
}

fn override_map(overrides: &[(String, String)]) -> BTreeMap<String, SpecifierList> {
    overrides
        .iter()
        .map(|(name, version)| (name.clone(), SpecifierList::One(version.clone())))
        .collect()
}
