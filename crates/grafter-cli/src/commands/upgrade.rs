//! Upgrade planning and manifest application.

use crate::commands::resolve_matrix;
use crate::reporter::ConsoleReporter;
use grafter_core::{
    apply_plan, plan_upgrades, retain_prefix, PackageManager, PackageManifest, PlanOptions,
    ResolutionPolicy, UserConfig,
};
use std::path::Path;
use std::process::ExitCode;

pub fn run(
    dir: &Path,
    most_compatible: bool,
    write: bool,
    include_undeclared: bool,
    overrides: &[(String, String)],
) -> ExitCode {
    let config = UserConfig::load();

    let manifest_path = dir.join("package.json");
    let mut manifest = match PackageManifest::from_path(&manifest_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let Some((matrix, core_version)) = resolve_matrix(dir, &config, overrides) else {
        return ExitCode::FAILURE;
    };

    let policy = if most_compatible {
        ResolutionPolicy::MostCompatible
    } else {
        ResolutionPolicy::Exact
    };
    let package_manager = PackageManager::detect();
    let opts = PlanOptions {
        policy,
        include_undeclared,
        package_manager,
    };

    println!("Planning upgrades against core {core_version}:");
    let plan = plan_upgrades(
        dir,
        &manifest,
        &matrix,
        &config.packages.core,
        &opts,
        &ConsoleReporter,
    );

    if plan.is_empty() {
        println!("\nnothing to change");
        return ExitCode::SUCCESS;
    }

    if !write {
        println!("\n{} change(s) planned (dry run, pass -w to write)", plan.len());
        return ExitCode::SUCCESS;
    }

    let lockfile_present = package_manager
        .map(|pm| pm.lockfile_present(dir))
        .unwrap_or(false);
    let outcome = apply_plan(
        &mut manifest,
        &plan,
        retain_prefix(policy, lockfile_present),
        lockfile_present,
        include_undeclared,
    );

    if outcome.changed.is_empty() {
        println!("\nmanifest already carries every target");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = manifest.write(&manifest_path) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    println!("\nwrote {}", manifest_path.display());

    if outcome.needs_lock_refresh {
        if let Some(pm) = package_manager {
            let cmd = pm.lock_refresh_cmd(&outcome.changed);
            println!("\nrunning: {}\n", cmd.join(" "));

            let result = grafter_core::run(&cmd);
            if !result.success {
                // The store is in an unknown state now; stop, with a clean
                // exit status for any surrounding install pipeline.
                eprintln!("lockfile refresh failed:\n{}", result.output);
                return ExitCode::SUCCESS;
            }
            println!("lockfile refreshed");
        }
    }

    ExitCode::SUCCESS
}
