//! Upgrade planning: which packages need a manifest edit, a store
//! reinstall, or both.

use crate::ecosystem::PackageManager;
use crate::manifest::PackageManifest;
use crate::matrix::CompatibilityMatrix;
use crate::report::Reporter;
use crate::store;
use std::path::Path;

/// How target versions are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Upgrade to the exact latest allowed version, keeping range prefixes.
    #[default]
    Exact,
    /// Most-compatible mode: prefixes survive only when a lockfile pins the
    /// install, and the coordinating package is pinned hard when none does.
    MostCompatible,
}

/// Options for a planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Active resolution policy.
    pub policy: ResolutionPolicy,
    /// Force packages into the plan even when the manifest does not declare
    /// them.
    pub include_undeclared: bool,
    /// The detected package manager, if any. Lockfile-dependent behavior is
    /// skipped when unknown.
    pub package_manager: Option<PackageManager>,
}

/// One package the plan wants to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    /// Package name.
    pub package: String,
    /// The version currently installed.
    pub current: String,
    /// The upgrade target (last entry of the allowed list).
    pub target: String,
    /// The installed copy already matches; only the manifest string is stale.
    pub manifest_only: bool,
    /// The manifest does not declare this package; it is only in the plan
    /// because the caller forced it in.
    pub undeclared: bool,
}

/// Compute the changes needed to bring the project in line with the matrix.
///
/// Packages that are not installed are skipped outright; undeclared packages
/// are skipped unless forced in. The target for each package is the last
/// entry of its allowed list. No-op entries are never recorded: a change only
/// lands when the installed copy or the declared specifier is stale.
pub fn plan_upgrades(
    base_dir: &Path,
    manifest: &PackageManifest,
    matrix: &CompatibilityMatrix,
    core_package: &str,
    opts: &PlanOptions,
    reporter: &dyn Reporter,
) -> Vec<PlannedChange> {
    let mut plan = Vec::new();

    for (package, specifiers) in &matrix.packages {
        let Some(current) = store::installed_version(base_dir, package) else {
            continue;
        };
        let declared = manifest.declared(package).map(|(spec, _)| spec);
        if declared.is_none() && !opts.include_undeclared {
            continue;
        }
        let Some(target) = specifiers.target() else {
            continue;
        };

        let change = if current == target {
            // Installed copy is fine; record only if the manifest string
            // does not already carry the target.
            if declared.is_some_and(|spec| spec.contains(target)) {
                continue;
            }
            PlannedChange {
                package: package.clone(),
                current: current.clone(),
                target: target.to_string(),
                manifest_only: true,
                undeclared: declared.is_none(),
            }
        } else {
            PlannedChange {
                package: package.clone(),
                current,
                target: target.to_string(),
                manifest_only: false,
                undeclared: declared.is_none(),
            }
        };

        reporter.change(&change);
        plan.push(change);
    }

    maybe_pin_core(base_dir, manifest, core_package, opts, reporter, &mut plan);

    plan
}

/// Most-compatible mode with no lockfile: nothing else pins the coordinating
/// package, so its current version must be written into the manifest even
/// when it is already compliant. Suppressed once the manifest declares the
/// exact version, which is what keeps a second planning run empty.
fn maybe_pin_core(
    base_dir: &Path,
    manifest: &PackageManifest,
    core_package: &str,
    opts: &PlanOptions,
    reporter: &dyn Reporter,
    plan: &mut Vec<PlannedChange>,
) {
    if opts.policy != ResolutionPolicy::MostCompatible {
        return;
    }
    let Some(pm) = opts.package_manager else {
        return;
    };
    if pm.lockfile_present(base_dir) {
        return;
    }
    if plan.iter().any(|c| c.package == core_package) {
        return;
    }
    let Some(current) = store::installed_version(base_dir, core_package) else {
        return;
    };

    let declared = manifest.declared(core_package).map(|(spec, _)| spec);
    if declared == Some(current.as_str()) {
        return;
    }

    let change = PlannedChange {
        package: core_package.to_string(),
        current: current.clone(),
        target: current,
        manifest_only: true,
        undeclared: declared.is_none(),
    };
    reporter.change(&change);
    plan.push(change);
}
