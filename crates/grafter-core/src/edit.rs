//! Applying a plan to the project manifest.

use crate::manifest::{DependencyClass, PackageManifest};
use crate::plan::{PlannedChange, ResolutionPolicy};

/// What a plan application did.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Every package whose manifest entry changed, with its new version.
    pub changed: Vec<(String, String)>,
    /// A lockfile was present at the start, so the caller must run a
    /// lockfile-only reinstall naming every changed package.
    pub needs_lock_refresh: bool,
}

/// Whether range prefixes survive a rewrite under the given policy.
pub fn retain_prefix(policy: ResolutionPolicy, lockfile_present: bool) -> bool {
    match policy {
        ResolutionPolicy::Exact => true,
        ResolutionPolicy::MostCompatible => lockfile_present,
    }
}

/// Rewrite a declared specifier to carry a new version.
///
/// An unchanged version comes back verbatim regardless of the prefix flag;
/// otherwise a leading `^` or `~` survives only when `retain` is set.
pub fn rewrite_specifier(old: &str, new_version: &str, retain: bool) -> String {
    if old == new_version {
        return old.to_string();
    }
    if retain {
        if let Some(prefix @ ('^' | '~')) = old.chars().next() {
            return format!("{prefix}{new_version}");
        }
    }
    new_version.to_string()
}

/// Apply planned changes to the manifest in place.
///
/// Undeclared entries are skipped unless the caller opted into them
/// (mirroring the planner's rule); the ones that do apply are upserted into
/// the regular dependency table with a bare specifier. Declared entries are
/// rewritten in whichever table they live.
pub fn apply_plan(
    manifest: &mut PackageManifest,
    plan: &[PlannedChange],
    retain: bool,
    lockfile_present: bool,
    include_undeclared: bool,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome {
        needs_lock_refresh: lockfile_present,
        ..Default::default()
    };

    for change in plan {
        if change.undeclared && !include_undeclared {
            continue;
        }

        match manifest.declared(&change.package) {
            Some((old, class)) => {
                let new_spec = rewrite_specifier(old, &change.target, retain);
                if new_spec != old {
                    manifest.upsert(&change.package, &new_spec, class);
                    outcome
                        .changed
                        .push((change.package.clone(), change.target.clone()));
                }
            }
            None => {
                manifest.upsert(&change.package, &change.target, DependencyClass::Regular);
                outcome
                    .changed
                    .push((change.package.clone(), change.target.clone()));
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(package: &str, current: &str, target: &str, undeclared: bool) -> PlannedChange {
        PlannedChange {
            package: package.to_string(),
            current: current.to_string(),
            target: target.to_string(),
            manifest_only: false,
            undeclared,
        }
    }

    #[test]
    fn rewrite_retains_caret_prefix() {
        assert_eq!(rewrite_specifier("^1.2.0", "1.3.0", true), "^1.3.0");
        assert_eq!(rewrite_specifier("~1.2.0", "1.3.0", true), "~1.3.0");
    }

    #[test]
    fn rewrite_strips_prefix_when_not_retained() {
        assert_eq!(rewrite_specifier("^1.2.0", "1.3.0", false), "1.3.0");
    }

    #[test]
    fn rewrite_unchanged_version_is_identity() {
        assert_eq!(rewrite_specifier("1.3.0", "1.3.0", true), "1.3.0");
        assert_eq!(rewrite_specifier("1.3.0", "1.3.0", false), "1.3.0");
    }

    #[test]
    fn rewrite_bare_specifier_stays_bare() {
        assert_eq!(rewrite_specifier("1.2.0", "1.3.0", true), "1.3.0");
    }

    #[test]
    fn apply_rewrites_in_owning_class() {
        let mut manifest = PackageManifest::parse(
            r#"{ "dependencies": { "pkg-a": "^1.0.0" },
                 "devDependencies": { "pkg-b": "~2.0.0" } }"#,
        )
        .unwrap();

        let plan = vec![
            change("pkg-a", "1.0.0", "1.1.0", false),
            change("pkg-b", "2.0.0", "2.1.0", false),
        ];
        let outcome = apply_plan(&mut manifest, &plan, true, true, false);

        assert_eq!(manifest.dependencies["pkg-a"], "^1.1.0");
        assert_eq!(manifest.dev_dependencies["pkg-b"], "~2.1.0");
        assert!(outcome.needs_lock_refresh);
        assert_eq!(
            outcome.changed,
            [
                ("pkg-a".to_string(), "1.1.0".to_string()),
                ("pkg-b".to_string(), "2.1.0".to_string())
            ]
        );
    }

    #[test]
    fn no_lock_refresh_without_lockfile() {
        let mut manifest =
            PackageManifest::parse(r#"{ "dependencies": { "pkg-a": "^1.0.0" } }"#).unwrap();
        let plan = vec![change("pkg-a", "1.0.0", "1.1.0", false)];
        let outcome = apply_plan(&mut manifest, &plan, false, false, false);
        assert!(!outcome.needs_lock_refresh);
        assert_eq!(manifest.dependencies["pkg-a"], "1.1.0");
    }

    #[test]
    fn undeclared_skipped_unless_opted_in() {
        let mut manifest = PackageManifest::default();
        let plan = vec![change("pkg-x", "1.0.0", "1.1.0", true)];

        let outcome = apply_plan(&mut manifest, &plan, true, false, false);
        assert!(outcome.changed.is_empty());
        assert!(manifest.dependencies.is_empty());

        let outcome = apply_plan(&mut manifest, &plan, true, false, true);
        assert_eq!(outcome.changed.len(), 1);
        assert_eq!(manifest.dependencies["pkg-x"], "1.1.0");
    }

    #[test]
    fn prefix_policy_table() {
        assert!(retain_prefix(ResolutionPolicy::Exact, false));
        assert!(retain_prefix(ResolutionPolicy::Exact, true));
        assert!(!retain_prefix(ResolutionPolicy::MostCompatible, false));
        assert!(retain_prefix(ResolutionPolicy::MostCompatible, true));
    }
}
