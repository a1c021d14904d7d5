//! Bounded resolution cache.

use ahash::AHashMap;
use parking_lot::RwLock;

/// Maps query strings to resolved country codes.
///
/// When an insert finds the cache full, every entry is dropped before the
/// new one is stored. Lookups take a shared lock; inserts and resets take
/// the exclusive lock.
pub struct CountryCache {
    entries: RwLock<AHashMap<String, String>>,
    capacity: usize,
}

impl CountryCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::with_capacity(capacity)),
            capacity,
        }
    }

    /// Look up a query string.
    pub fn get(&self, ip: &str) -> Option<String> {
        self.entries.read().get(ip).cloned()
    }

    /// Store a resolution, resetting the cache first if it is full.
    pub fn insert(&self, ip: &str, country: &str) {
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(ip) {
            log::debug!("Country cache full ({} entries), resetting", entries.len());
            entries.clear();
        }
        entries.insert(ip.to_string(), country.to_string());
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
}
