//! Read-only compliance audit.

use crate::commands::resolve_matrix;
use crate::reporter::ConsoleReporter;
use grafter_core::{check_compliance, UserConfig};
use std::path::Path;
use std::process::ExitCode;

pub fn run(dir: &Path, overrides: &[(String, String)]) -> ExitCode {
    let config = UserConfig::load();

    let Some((matrix, core_version)) = resolve_matrix(dir, &config, overrides) else {
        return ExitCode::FAILURE;
    };

    println!("Checking components against core {core_version}:");
    let discrepancies = check_compliance(dir, &matrix, &ConsoleReporter);

    if discrepancies.is_empty() {
        println!("\nall installed components are compatible");
        ExitCode::SUCCESS
    } else {
        println!("\n{} incompatible component(s)", discrepancies.len());
        println!("run 'grafter upgrade -w' to bring them in line");
        ExitCode::FAILURE
    }
}
