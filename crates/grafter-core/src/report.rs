//! Diagnostics sink injected into the checker and planner.

use crate::plan::PlannedChange;

/// Receives one line per audited package or planned change.
///
/// Every method has a no-op default so callers that only want the returned
/// lists can pass [`NullReporter`]. The CLI installs a console
/// implementation.
pub trait Reporter {
    /// An installed package matched its allowed list.
    fn pass(&self, _package: &str, _version: &str) {}

    /// An installed package failed the compliance check.
    fn fail(&self, _package: &str, _current: &str, _allowed: &[String]) {}

    /// The planner recorded a change.
    fn change(&self, _change: &PlannedChange) {}

    /// A formatted error that aborts the current operation.
    fn error(&self, _message: &str) {}
}

/// Discards everything.
pub struct NullReporter;

impl Reporter for NullReporter {}
