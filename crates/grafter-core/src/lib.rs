//! grafter core: version reconciliation between a project's installed
//! component packages and the compatibility matrix shipped with the kit
//! core package.
//!
//! The read path audits installed versions against the matrix; the write
//! path plans and applies the minimal set of manifest edits that restores
//! compliance.

mod check;
mod config;
mod ecosystem;
mod edit;
mod manifest;
mod matrix;
mod plan;
mod registry;
mod report;
mod store;

pub use check::{check_compliance, Discrepancy};
pub use config::{PackagesConfig, RegistryConfig, UserConfig};
pub use ecosystem::{run, CommandOutcome, PackageManager};
pub use edit::{apply_plan, retain_prefix, rewrite_specifier, ApplyOutcome};
pub use manifest::{DependencyClass, ManifestError, PackageManifest};
pub use matrix::{locate, CompatibilityMatrix, MatrixError, SpecifierList};
pub use plan::{plan_upgrades, PlanOptions, PlannedChange, ResolutionPolicy};
pub use registry::{RegistryClient, RegistryError};
pub use report::{NullReporter, Reporter};
pub use store::installed_version;

use std::path::{Path, PathBuf};

/// Directory inside the installed core package that holds the matrix
/// documents.
pub const MATRIX_DIR: &str = "versions";

/// Resolve the matrix directory from the installed core package, or None
/// when the core package is not installed (a missing prerequisite for any
/// check).
pub fn matrix_dir(base_dir: &Path, core_package: &str) -> Option<PathBuf> {
    let dir = base_dir
        .join("node_modules")
        .join(core_package)
        .join(MATRIX_DIR);
    dir.is_dir().then_some(dir)
}
