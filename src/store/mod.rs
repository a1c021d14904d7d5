//! Dual-index range store.
//!
//! A single redb database file holds three tables:
//! - `ip_ranges`: range text exactly as written in the zone file -> country
//! - `ip_ranges_numeric`: `be(start) || be(end)` -> country
//! - `ip_prefix_index`: reserved, created but never populated
//!
//! Every write touches the textual and numeric tables inside one write
//! transaction, so readers never observe one index ahead of the other.

mod batch;
mod import;


pub use import::{zone_country_code, ImportStats};

pub(crate) use batch::WriteBatch;

use redb::{Database, DatabaseError, ReadTransaction, ReadableTable, TableDefinition};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::range::{decode_range_key, range_key};

/// Textual index: original range expression -> country code.
pub(crate) const RANGES: TableDefinition<&str, &str> = TableDefinition::new("ip_ranges");

/// Numeric index: 8-byte big-endian `start || end` -> country code.
pub(crate) const NUMERIC_RANGES: TableDefinition<&[u8], &str> =
    TableDefinition::new("ip_ranges_numeric");

/// Reserved for prefix indexing.
pub(crate) const PREFIX_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("ip_prefix_index");

/// Interval between attempts to acquire a locked database file.
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Result of walking the numeric index in key order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexAudit {
    /// Number of numeric entries walked.
    pub entries: usize,
    /// Positions whose `start` is lower than the previous entry's.
    pub out_of_order: usize,
    #[serde(skip)]
    last_start: Option<u32>,
}

impl IndexAudit {
    fn observe(&mut self, start: u32) {
        if let Some(previous) = self.last_start {
            if start < previous {
                self.out_of_order += 1;
            }
        }
        self.last_start = Some(start);
        self.entries += 1;
    }

    /// Whether the walk found every entry in ascending order.
    pub fn is_ordered(&self) -> bool {
        self.out_of_order == 0
    }
}

/// Persistent store holding the textual and numeric range indexes.
///
/// The handle is `Sync`: any number of threads may resolve through it while
/// write transactions (imports, upserts) are serialized by the database.
///
/// # Example
///
/// ```ignore
/// use ipzone::{parse_range, ZoneStore};
///
/// let store = ZoneStore::open("ip_country.db", false)?;
/// let stats = store.import_directory("zones/")?;
/// println!("{} ranges processed, {} updated", stats.processed, stats.updated);
///
/// let (start, end) = parse_range("8.8.8.0/24")?;
/// store.upsert_range("8.8.8.0/24", start, end, "US")?;
/// store.close()?;
/// ```
pub struct ZoneStore {
    db: Database,
    path: PathBuf,
    read_only: bool,
    config: StoreConfig,
}

impl ZoneStore {
    /// Open or create a store with default configuration.
    pub fn open(path: impl AsRef<Path>, read_only: bool) -> Result<Self> {
        Self::open_with_config(path, read_only, StoreConfig::default())
    }

    /// Open or create a store with custom configuration.
    ///
    /// Read-only stores require an existing file and never create tables.
    /// Otherwise the file is created if missing and all three tables are
    /// ensured.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        read_only: bool,
        config: StoreConfig,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = open_database(&path, read_only, config.lock_timeout())?;

        let store = Self {
            db,
            path,
            read_only,
            config,
        };

        if !store.read_only {
            store.ensure_tables()?;
        }

        log::info!(
            "Opened zone store {:?}{}",
            store.path,
            if store.read_only { " (read-only)" } else { "" }
        );
        Ok(store)
    }

    /// Close the store, releasing the file lock.
    pub fn close(self) -> Result<()> {
        log::debug!("Closing zone store {:?}", self.path);
        drop(self.db);
        Ok(())
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store rejects writes.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create any missing table. Idempotent.
    fn ensure_tables(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        txn.open_table(RANGES)?;
        txn.open_table(NUMERIC_RANGES)?;
        txn.open_table(PREFIX_INDEX)?;
        txn.commit()?;
        Ok(())
    }

    pub(crate) fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    pub(crate) fn begin_read(&self) -> Result<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Associate a range with a country in both indexes.
    ///
    /// Writes unconditionally in a single transaction. The bounds are taken
    /// as given; use [`parse_range`](crate::parse_range) to derive them from
    /// `range`.
    pub fn upsert_range(&self, range: &str, start: u32, end: u32, country: &str) -> Result<()> {
        self.ensure_writable()?;

        let txn = self.db.begin_write()?;
        {
            let mut ranges = txn.open_table(RANGES)?;
            ranges.insert(range, country)?;

            let mut numeric = txn.open_table(NUMERIC_RANGES)?;
            let key = range_key(start, end);
            numeric.insert(&key[..], country)?;
        }
        txn.commit()?;

        log::debug!("Upserted {} -> {}", range, country);
        Ok(())
    }

    /// Walk the numeric index and count entries out of ascending order.
    ///
    /// Disorder is reported, never corrected.
    pub fn verify_numeric_order(&self) -> Result<IndexAudit> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NUMERIC_RANGES)?;

        let mut audit = IndexAudit::default();
        for entry in table.iter()? {
            let (key, _) = entry?;
            if let Some((start, _)) = decode_range_key(key.value()) {
                audit.observe(start);
            }
        }

        if !audit.is_ordered() {
            log::warn!(
                "{} of {} numeric ranges are not correctly sorted",
                audit.out_of_order,
                audit.entries
            );
        }
        Ok(audit)
    }
}

/// Open the database, retrying while another handle holds the file lock.
fn open_database(path: &Path, read_only: bool, timeout: Duration) -> Result<Database> {
    let deadline = Instant::now() + timeout;
    loop {
        let attempt = if read_only {
            Database::open(path)
        } else {
            Database::create(path)
        };

        match attempt {
            Ok(db) => return Ok(db),
            Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                thread::sleep(LOCK_RETRY_INTERVAL);
            }
            Err(source) => {
                return Err(Error::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}
