//! Registry latest-version lookup.

use grafter_core::{RegistryClient, UserConfig};
use std::process::ExitCode;

pub fn run(package: Option<&str>) -> ExitCode {
    let config = UserConfig::load();
    let package = package.unwrap_or(&config.packages.core);

    let client = match &config.registry.url {
        Some(url) => RegistryClient::with_registry(url),
        None => RegistryClient::new(),
    };

    match client.latest(package) {
        Ok(version) => {
            println!("{package} {version}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
