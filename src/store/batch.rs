//! Batched writes to both range indexes.

use redb::ReadableTable;

use super::{ZoneStore, NUMERIC_RANGES, RANGES};
use crate::error::Result;
use crate::range::NumericRange;

/// One parsed zone line awaiting commit.
#[derive(Debug, Clone)]
struct BatchEntry {
    /// Range text as it appeared in the zone file
    text: String,
    range: NumericRange,
}

/// Ranges accumulated for a single write transaction.
#[derive(Debug, Default)]
pub(crate) struct WriteBatch {
    entries: Vec<BatchEntry>,
}

impl WriteBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, text: &str, range: NumericRange) {
        self.entries.push(BatchEntry {
            text: text.to_string(),
            range,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ZoneStore {
    /// Commit a batch in one write transaction.
    ///
    /// Returns the number of textual entries whose stored country changed.
    /// Numeric entries are written when absent or different but never
    /// counted, so the count may diverge from what the numeric index saw.
    pub(crate) fn commit_batch(&self, batch: &WriteBatch) -> Result<usize> {
        self.ensure_writable()?;

        let mut updated = 0;
        let txn = self.db.begin_write()?;
        {
            let mut ranges = txn.open_table(RANGES)?;
            for entry in &batch.entries {
                let country = entry.range.country.as_str();
                let unchanged = ranges
                    .get(entry.text.as_str())?
                    .map(|existing| existing.value() == country)
                    .unwrap_or(false);
                if !unchanged {
                    ranges.insert(entry.text.as_str(), country)?;
                    updated += 1;
                }
            }

            let mut numeric = txn.open_table(NUMERIC_RANGES)?;
            for entry in &batch.entries {
                let key = entry.range.key();
                let country = entry.range.country.as_str();
                let unchanged = numeric
                    .get(&key[..])?
                    .map(|existing| existing.value() == country)
                    .unwrap_or(false);
                if !unchanged {
                    numeric.insert(&key[..], country)?;
                }
            }
        }
        txn.commit()?;

        log::debug!(
            "Committed batch of {} ranges ({} updated)",
            batch.len(),
            updated
        );
        Ok(updated)
    }
}
