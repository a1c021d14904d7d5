//! Zone file ingestion.
//!
//! A zone file lists the ranges of one country, one per line, either as
//! `start-end` or CIDR. The country code is the file name up to the first
//! `.`, e.g. `FR.zone` -> `FR`.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use super::{WriteBatch, ZoneStore};
use crate::error::{Error, Result};
use crate::range::{is_private_or_local, NumericRange};

/// Counters reported by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Public range lines read (including ones that failed to parse).
    pub processed: usize,
    /// Textual index entries actually written or changed.
    pub updated: usize,
}

impl AddAssign for ImportStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.updated += other.updated;
    }
}

/// Derive the country code from a zone file name.
pub fn zone_country_code(path: &Path) -> Result<String> {
    let code = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or("");

    if code.is_empty() {
        return Err(Error::InvalidZoneName(path.to_path_buf()));
    }
    Ok(code.to_string())
}

/// Blank lines and `#` / `//` comments.
fn is_ignored_line(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("//")
}

impl ZoneStore {
    /// Import a single zone file.
    ///
    /// Private and local CIDRs are skipped without being counted. Lines that
    /// fail to parse are counted as processed but never written. Ranges are
    /// committed in batches of `batch_size`; a failed commit aborts the
    /// import, leaving earlier batches in place.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportStats> {
        self.ensure_writable()?;

        let path = path.as_ref();
        let country = zone_country_code(path)?;
        let reader = BufReader::new(File::open(path)?);

        let batch_size = self.config.batch_size.max(1);
        let mut batch = WriteBatch::with_capacity(batch_size);
        let mut stats = ImportStats::default();
        let mut private = 0usize;

        for line in reader.split(b'\n') {
            let line = line?;
            // Comments may carry non-UTF-8 bytes.
            let line = String::from_utf8_lossy(&line);
            let text = line.trim();

            if is_ignored_line(text) {
                continue;
            }

            if is_private_or_local(text) {
                log::trace!("Skipping private range {} in {:?}", text, path);
                private += 1;
                continue;
            }

            stats.processed += 1;

            let range = match NumericRange::parse(text, country.as_str()) {
                Ok(range) => range,
                Err(e) => {
                    log::debug!("Skipping line in {:?}: {}", path, e);
                    continue;
                }
            };

            batch.push(text, range);
            if batch.len() >= batch_size {
                stats.updated += self.commit_batch(&batch)?;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            stats.updated += self.commit_batch(&batch)?;
        }

        log::info!(
            "Imported {:?} ({}): {} processed, {} updated, {} private skipped",
            path,
            country,
            stats.processed,
            stats.updated,
            private
        );
        Ok(stats)
    }

    /// Import every zone file in a directory.
    ///
    /// The configured excluded file is skipped. A file that fails to import
    /// is logged and skipped; its partial counts are not included.
    pub fn import_directory(&self, dir: impl AsRef<Path>) -> Result<ImportStats> {
        self.ensure_writable()?;

        let dir = dir.as_ref();
        let files = self.zone_files(dir)?;

        let mut total = ImportStats::default();
        for file in &files {
            match self.import_file(file) {
                Ok(stats) => total += stats,
                Err(e) => log::warn!("Error processing file {:?}: {}", file, e),
            }
        }

        log::info!(
            "Imported {} zone files from {:?}: {} processed, {} updated",
            files.len(),
            dir,
            total.processed,
            total.updated
        );
        Ok(total)
    }

    /// Zone files in `dir`, sorted by path.
    fn zone_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let suffix = format!(".{}", self.config.zone_extension);
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            // `.zone` matches too and fails later on its empty country code.
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !name.ends_with(&suffix) {
                continue;
            }

            if name == self.config.excluded_zone {
                log::debug!("Skipping excluded zone file {:?}", path);
                continue;
            }

            files.push(path);
        }
        files.sort();
        Ok(files)
    }
}
