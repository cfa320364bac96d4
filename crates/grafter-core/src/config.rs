//! User configuration from ~/.config/grafter/config.toml

use serde::Deserialize;
use std::path::PathBuf;

/// User configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Package identity overrides.
    pub packages: PackagesConfig,
    /// Registry settings.
    pub registry: RegistryConfig,
}

/// Which packages coordinate the kit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// The coordinating core package.
    pub core: String,
    /// The companion package, historically versioned independently.
    pub companion: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            core: "@grafter/core".to_string(),
            companion: "@grafter/adorn".to_string(),
        }
    }
}

/// Registry settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry URL override; the public npm registry when unset.
    pub url: Option<String>,
}

impl UserConfig {
    /// Load user config from the default path (~/.config/grafter/config.toml).
    pub fn load() -> Self {
        Self::from_path(Self::default_path()).unwrap_or_default()
    }

    /// Load user config from a specific path.
    pub fn from_path(path: Option<PathBuf>) -> Option<Self> {
        let path = path?;
        let contents = std::fs::read_to_string(&path).ok()?;
        toml::from_str(&contents).ok()
    }

    /// Get the default config path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("grafter").join("config.toml"))
    }
}
