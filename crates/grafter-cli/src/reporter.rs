//! Console implementation of the core Reporter seam.

use grafter_core::{PlannedChange, Reporter};

/// Prints one line per audited package or planned change.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn pass(&self, package: &str, version: &str) {
        println!("  {package}: OK ({version})");
    }

    fn fail(&self, package: &str, current: &str, allowed: &[String]) {
        println!(
            "  {package}: {current} not in allowed [{}]",
            allowed.join(", ")
        );
    }

    fn change(&self, change: &PlannedChange) {
        let marker = if change.undeclared {
            " (not declared)"
        } else {
            ""
        };
        if change.manifest_only {
            println!(
                "  {}: manifest -> {}{marker}",
                change.package, change.target
            );
        } else {
            println!(
                "  {}: {} -> {}{marker}",
                change.package, change.current, change.target
            );
        }
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
