//! Package-manager detection and lockfile interaction.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Known JavaScript package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// npm
    Npm,
    /// Yarn
    Yarn,
    /// pnpm
    Pnpm,
}

impl PackageManager {
    /// Get the string identifier for this package manager.
    pub fn id(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Parse from string identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "npm" => Some(PackageManager::Npm),
            "yarn" => Some(PackageManager::Yarn),
            "pnpm" => Some(PackageManager::Pnpm),
            _ => None,
        }
    }

    /// Classify a `npm_config_user_agent` value.
    ///
    /// The containment order pnpm, npm, yarn is load-bearing: pnpm and yarn
    /// agents both embed an `npm/...` token, so pnpm must be tested first
    /// and npm before yarn.
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        if user_agent.contains("pnpm") {
            Some(PackageManager::Pnpm)
        } else if user_agent.contains("npm") {
            Some(PackageManager::Npm)
        } else if user_agent.contains("yarn") {
            Some(PackageManager::Yarn)
        } else {
            None
        }
    }

    /// Detect the invoking package manager from the process environment.
    pub fn detect() -> Option<Self> {
        let user_agent = std::env::var("npm_config_user_agent").ok()?;
        Self::from_user_agent(&user_agent)
    }

    /// The lockfile name this package manager maintains.
    pub fn lockfile_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Pnpm => "pnpm-lock.yaml",
        }
    }

    /// Path of this manager's lockfile within a project.
    pub fn lockfile_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.lockfile_name())
    }

    /// Whether this manager's lockfile exists in the project.
    pub fn lockfile_present(&self, base_dir: &Path) -> bool {
        self.lockfile_path(base_dir).is_file()
    }

    /// The lockfile-only refresh command naming every changed package.
    pub fn lock_refresh_cmd(&self, packages: &[(String, String)]) -> Vec<String> {
        let pinned = packages.iter().map(|(name, version)| format!("{name}@{version}"));
        match self {
            PackageManager::Npm => {
                let mut cmd = vec![
                    "npm".into(),
                    "install".into(),
                    "--package-lock-only".into(),
                ];
                cmd.extend(pinned);
                cmd
            }
            PackageManager::Yarn => {
                let mut cmd = vec!["yarn".into(), "upgrade".into()];
                cmd.extend(pinned);
                cmd
            }
            PackageManager::Pnpm => {
                let mut cmd = vec![
                    "pnpm".into(),
                    "install".into(),
                    "--lockfile-only".into(),
                ];
                cmd.extend(pinned);
                cmd
            }
        }
    }
}

/// Outcome of a blocking external command invocation.
#[derive(Debug)]
pub struct CommandOutcome {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Captured stdout and stderr, for diagnostic display on failure.
    pub output: String,
}

/// Run an external command to completion, capturing its output.
///
/// A spawn failure is reported the same way as a non-zero exit; the caller
/// decides that both are fatal to the run.
pub fn run(cmd: &[String]) -> CommandOutcome {
    let Some((program, args)) = cmd.split_first() else {
        return CommandOutcome {
            success: false,
            output: "empty command".to_string(),
        };
    };

    match Command::new(program).args(args).output() {
        Ok(out) => {
            let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&out.stderr));
            CommandOutcome {
                success: out.status.success(),
                output,
            }
        }
        Err(e) => CommandOutcome {
            success: false,
            output: format!("failed to run {program}: {e}"),
        },
    }
}
