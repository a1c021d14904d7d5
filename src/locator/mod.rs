//! IPv4 to country resolution.
//!
//! Lookups go through three layers:
//! 1. The in-memory [`CountryCache`], keyed by the exact query string
//! 2. An ordered scan of the numeric index that stops at the first range
//!    starting past the target
//! 3. A full scan of the textual index as a fallback
//!
//! Successful resolutions are cached. The cache is never invalidated by
//! later writes to the store, so a cached answer can outlive an upsert.

mod cache;

pub use cache::{CacheStats, CountryCache};

use redb::{ReadTransaction, ReadableTable};

use crate::config::LocatorConfig;
use crate::error::{Error, Result};
use crate::range::{address_to_int, decode_range_key, RangeSpec};
use crate::store::{ZoneStore, NUMERIC_RANGES, RANGES};

/// Resolves IPv4 addresses to country codes over a [`ZoneStore`].
///
/// # Example
///
/// ```ignore
/// use ipzone::{Locator, ZoneStore};
///
/// let store = ZoneStore::open("ip_country.db", true)?;
/// let locator = Locator::new(&store, 10_000);
///
/// assert_eq!(locator.resolve("8.8.8.8")?, "US");
/// let ranges = locator.ranges("FR")?;
/// ```
pub struct Locator<'a> {
    store: &'a ZoneStore,
    cache: Option<CountryCache>,
}

impl<'a> Locator<'a> {
    /// Create a locator with a cache of `cache_size` entries.
    ///
    /// A size of `0` disables caching.
    pub fn new(store: &'a ZoneStore, cache_size: usize) -> Self {
        let cache = if cache_size > 0 {
            Some(CountryCache::new(cache_size))
        } else {
            None
        };
        Self { store, cache }
    }

    /// Create a locator from configuration.
    pub fn with_config(store: &'a ZoneStore, config: &LocatorConfig) -> Self {
        Self::new(store, config.cache_capacity)
    }

    /// The underlying store.
    pub fn store(&self) -> &'a ZoneStore {
        self.store
    }

    /// Resolve the country code for an IPv4 address.
    pub fn resolve(&self, ip: &str) -> Result<String> {
        if let Some(ref cache) = self.cache {
            if let Some(country) = cache.get(ip) {
                return Ok(country);
            }
        }

        let target = address_to_int(ip)?;

        let txn = self.store.begin_read()?;
        let country = match scan_numeric(&txn, target)? {
            Some(country) => country,
            None => {
                log::debug!("No numeric range for {}, scanning textual index", ip);
                scan_textual(&txn, target)?.ok_or_else(|| Error::NotFound(ip.to_string()))?
            }
        };

        if let Some(ref cache) = self.cache {
            cache.insert(ip, &country);
        }
        Ok(country)
    }

    /// All range expressions stored for a country, in index order.
    pub fn ranges(&self, country: &str) -> Result<Vec<String>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(RANGES)?;

        let mut ranges = Vec::new();
        for entry in table.iter()? {
            let (range, code) = entry?;
            if code.value() == country {
                ranges.push(range.value().to_string());
            }
        }
        Ok(ranges)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        match self.cache {
            Some(ref cache) => CacheStats {
                capacity: cache.capacity(),
                len: cache.len(),
                enabled: true,
            },
            None => CacheStats {
                capacity: 0,
                len: 0,
                enabled: false,
            },
        }
    }
}

/// Walk the numeric index in ascending `start` order.
///
/// Keys are big-endian, so once an entry starts past the target no later
/// entry can contain it.
fn scan_numeric(txn: &ReadTransaction, target: u32) -> Result<Option<String>> {
    let table = txn.open_table(NUMERIC_RANGES)?;
    for entry in table.iter()? {
        let (key, country) = entry?;
        let Some((start, end)) = decode_range_key(key.value()) else {
            continue;
        };

        if start <= target && target <= end {
            return Ok(Some(country.value().to_string()));
        }
        if start > target {
            break;
        }
    }
    Ok(None)
}

/// Test every stored range expression until one contains the target.
fn scan_textual(txn: &ReadTransaction, target: u32) -> Result<Option<String>> {
    let table = txn.open_table(RANGES)?;
    for entry in table.iter()? {
        let (range, country) = entry?;
        let matched = RangeSpec::parse(range.value())
            .map(|spec| spec.contains(target))
            .unwrap_or(false);
        if matched {
            return Ok(Some(country.value().to_string()));
        }
    }
    Ok(None)
}
