mod commands;
mod reporter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "grafter")]
#[command(about = "Audit and repair component-kit version drift", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Audit installed component versions against the compatibility matrix
    Check {
        /// Project directory containing package.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Override a matrix entry (can be repeated)
        #[arg(long = "set", value_name = "NAME=VERSION", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },

    /// Upgrade component versions to their matrix targets
    Upgrade {
        /// Project directory containing package.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Most-compatible mode: pin hard when no lockfile does
        #[arg(short = 'm', long = "most-compatible")]
        most_compatible: bool,

        /// Write the updated manifest (dry run otherwise)
        #[arg(short = 'w', long)]
        write: bool,

        /// Force packages absent from the manifest into the plan
        #[arg(long = "include-pkg-not-exists")]
        include_undeclared: bool,

        /// Override a matrix entry (can be repeated)
        #[arg(long = "set", value_name = "NAME=VERSION", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },

    /// Look up the latest published version of a package
    Latest {
        /// Package name (default: the coordinating core package)
        package: Option<String>,
    },
}

fn parse_override(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid NAME=VERSION: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { dir, overrides } => commands::check::run(&dir, &overrides),
        Command::Upgrade {
            dir,
            most_compatible,
            write,
            include_undeclared,
            overrides,
        } => commands::upgrade::run(&dir, most_compatible, write, include_undeclared, &overrides),
        Command::Latest { package } => commands::latest::run(package.as_deref()),
    }
}
