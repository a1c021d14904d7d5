//! ipzone - IPv4 to country resolution over a persistent range index.
//!
//! Country zone files (one IP range per line, one file per country) are
//! imported into a single database file that keeps two synchronized
//! indexes of the same ranges:
//!
//! - **Textual index**: the range exactly as written (`1.0.0.0-1.0.0.255` or
//!   `1.0.0.0/24`) mapped to its country code
//! - **Numeric index**: an 8-byte big-endian `start || end` key mapped to the
//!   country code
//!
//! Big-endian fixed-width keys sort in the same order as the addresses they
//! encode, so the numeric index can be scanned in ascending `start` order
//! and abandoned as soon as a range begins past the queried address.
//!
//! # Quick Start
//!
//! ```ignore
//! use ipzone::{Locator, ZoneStore};
//!
//! let store = ZoneStore::open("ip_country.db", false)?;
//! let stats = store.import_directory("zones/")?;
//! println!("{} processed, {} updated", stats.processed, stats.updated);
//!
//! let locator = Locator::new(&store, 10_000);
//! let country = locator.resolve("8.8.8.8")?;
//! ```
//!
//! # Zone Files
//!
//! - File name: `<country>.zone`, e.g. `FR.zone`
//! - One range per line: `start-end` or CIDR `address/prefix`
//! - Blank lines and lines starting with `#` or `//` are ignored
//! - Private, loopback and link-local CIDRs are skipped
//! - `zz.zone` is skipped by directory imports
//!
//! # Resolution Order
//!
//! 1. Cache (exact query string)
//! 2. Numeric index, ordered scan with early exit
//! 3. Textual index, full scan

mod config;
mod error;
mod locator;
mod range;
mod store;

// Re-export core types
pub use config::{
    Config, LocatorConfig, StoreConfig, DEFAULT_BATCH_SIZE, DEFAULT_CACHE_CAPACITY,
    DEFAULT_EXCLUDED_ZONE, DEFAULT_ZONE_EXTENSION,
};
pub use error::{Error, Result};

// Re-export range codec
pub use range::{
    address_to_int, contains_address, decode_be, decode_range_key, encode_be, int_to_address,
    is_private_or_local, parse_range, range_key, NumericRange, RangeSpec, RANGE_KEY_SIZE,
};

// Re-export store and locator
pub use locator::{CacheStats, CountryCache, Locator};
pub use store::{zone_country_code, ImportStats, IndexAudit, ZoneStore};
