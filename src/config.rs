//! Store, locator and file-level configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of ranges committed per write transaction.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default resolution cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default zone file extension (without the dot).
pub const DEFAULT_ZONE_EXTENSION: &str = "zone";

/// Zone file skipped by directory imports.
pub const DEFAULT_EXCLUDED_ZONE: &str = "zz.zone";

/// Default time to wait for the database file lock.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 1000;

/// Configuration for a [`ZoneStore`](crate::ZoneStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Ranges accumulated before a batch is committed.
    pub batch_size: usize,
    /// Extension identifying zone files in a directory.
    pub zone_extension: String,
    /// File name skipped during directory import.
    pub excluded_zone: String,
    /// How long `open` keeps retrying while another handle holds the lock.
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            zone_extension: DEFAULT_ZONE_EXTENSION.to_string(),
            excluded_zone: DEFAULT_EXCLUDED_ZONE.to_string(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Create a configuration with the specified batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    /// Lock timeout as a [`Duration`].
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Configuration for a [`Locator`](crate::Locator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Maximum number of cached resolutions. `0` disables the cache.
    pub cache_capacity: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl LocatorConfig {
    /// Create a configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self { cache_capacity: 0 }
    }
}

/// Top-level configuration, as read from a YAML file.
///
/// ```yaml
/// database: /var/lib/ipzone/ip_country.db
/// store:
///   batch_size: 5000
/// locator:
///   cache_capacity: 50000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file path.
    pub database: Option<PathBuf>,
    pub store: StoreConfig,
    pub locator: LocatorConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.batch_size == 0 {
            return Err(Error::Config("store.batch_size must be positive".to_string()));
        }
        if self.store.zone_extension.is_empty() {
            return Err(Error::Config(
                "store.zone_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database, None);
        assert_eq!(config.store.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.store.excluded_zone, "zz.zone");
        assert_eq!(config.store.lock_timeout(), Duration::from_secs(1));
        assert_eq!(config.locator.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml("locator:\n  cache_capacity: 42\n").unwrap();
        assert_eq!(config.locator.cache_capacity, 42);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
database: /tmp/zones.db
store:
  batch_size: 10
  zone_extension: txt
  excluded_zone: skip.txt
  lock_timeout_ms: 50
locator:
  cache_capacity: 0
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/zones.db")));
        assert_eq!(config.store.batch_size, 10);
        assert_eq!(config.store.zone_extension, "txt");
        assert_eq!(config.store.excluded_zone, "skip.txt");
        assert_eq!(config.store.lock_timeout_ms, 50);
        assert_eq!(config.locator, LocatorConfig::no_cache());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = Config::from_yaml("store:\n  batch_size: 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("store: [1, 2");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ipzone.yaml");
        fs::write(&path, "store:\n  batch_size: 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.store.batch_size, 7);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/ipzone.yaml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
