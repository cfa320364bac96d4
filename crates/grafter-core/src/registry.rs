//! npm registry client for latest-published-version lookups, with local
//! caching.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// A registry client with a TTL'd on-disk cache.
pub struct RegistryClient {
    registry: String,
    cache_dir: PathBuf,
    cache_ttl: Duration,
}

/// The slice of a registry "latest" document we read.
#[derive(Debug, Deserialize)]
struct LatestMeta {
    version: String,
}

/// Errors from the registry client.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
    #[error("package not found: {0}")]
    NotFound(String),
}

impl RegistryClient {
    /// Create a client against the default public registry.
    pub fn new() -> Self {
        Self::with_registry(DEFAULT_REGISTRY)
    }

    /// Create a client against a custom registry URL.
    pub fn with_registry(registry: &str) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("grafter")
            .join("registry");

        Self {
            registry: registry.trim_end_matches('/').to_string(),
            cache_dir,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Override the cache directory.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Look up the latest published version of a package.
    pub fn latest(&self, package: &str) -> Result<String, RegistryError> {
        // Check cache first
        if let Some(cached) = self.read_cache(package)? {
            return Ok(cached);
        }

        let version = self.fetch_latest(package)?;
        self.write_cache(package, &version)?;

        Ok(version)
    }

    fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let url = format!("{}/{}/latest", self.registry, package);

        let response = ureq::get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(404, _) => RegistryError::NotFound(package.to_string()),
                other => RegistryError::Http(other.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|e| RegistryError::Http(e.to_string()))?;
        let meta: LatestMeta = serde_json::from_str(&body)?;

        Ok(meta.version)
    }

    /// Read from cache if still within the TTL.
    fn read_cache(&self, package: &str) -> Result<Option<String>, RegistryError> {
        let cache_path = self.cache_path(package);

        if !cache_path.exists() {
            return Ok(None);
        }

        let metadata = std::fs::metadata(&cache_path)?;
        let modified = metadata.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::MAX);

        if age > self.cache_ttl {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&cache_path)?;
        let meta: LatestMeta = serde_json::from_str(&contents)?;
        Ok(Some(meta.version))
    }

    fn write_cache(&self, package: &str, version: &str) -> Result<(), RegistryError> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let contents = serde_json::json!({ "version": version }).to_string();
        std::fs::write(self.cache_path(package), contents)?;
        Ok(())
    }

    /// Scoped package names contain a slash; flatten it for the cache file.
    fn cache_path(&self, package: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", package.replace('/', "__")))
    }

    /// Clear all cached data.
    pub fn clear_cache(&self) -> Result<(), RegistryError> {
        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}
