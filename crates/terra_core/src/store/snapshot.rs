//! Immutable catalog snapshot with its lookup indexes.

use super::row::StoredRow;
use crate::stats::CacheStats;
use std::collections::HashMap;
use terra_codec::{normalize_lookup_code, Record};
use tracing::warn;

/// One complete, immutable catalog snapshot.
///
/// Snapshots are built in full before they are published and never change
/// afterwards; readers hold an `Arc<Snapshot>` and cannot observe a
/// replacement in progress.
#[derive(Debug, Default)]
pub struct Snapshot {
    rows: Vec<StoredRow>,
    records: Vec<Record>,
    by_code: HashMap<String, usize>,
    by_short_code: HashMap<String, usize>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from stored rows, in the given order.
    ///
    /// A row whose code repeats an earlier row is dropped.
    #[must_use]
    pub fn from_rows(rows: Vec<StoredRow>) -> Self {
        let mut snapshot = Self::default();
        snapshot.rows.reserve(rows.len());
        snapshot.records.reserve(rows.len());

        for row in rows {
            if snapshot.by_code.contains_key(&row.code) {
                warn!(code = %row.code, "skipping duplicate row in snapshot");
                continue;
            }
            let position = snapshot.rows.len();
            snapshot.by_code.insert(row.code.clone(), position);
            if !row.short_code.is_empty() {
                snapshot
                    .by_short_code
                    .entry(row.short_code.clone())
                    .or_insert(position);
            }
            snapshot.records.push(row.to_record());
            snapshot.rows.push(row);
        }

        snapshot
    }

    /// Records in store order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Stored rows in store order.
    #[must_use]
    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indexed lookup by 3-letter code or 2-letter short code (any case).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Record> {
        let key = normalize_lookup_code(code)?;
        let index = if key.len() == 3 {
            &self.by_code
        } else {
            &self.by_short_code
        };
        index.get(&key).map(|&position| &self.records[position])
    }

    /// Oldest `last_updated` stamp among the rows.
    #[must_use]
    pub fn oldest_timestamp(&self) -> Option<u64> {
        self.rows.iter().map(|row| row.last_updated).min()
    }

    /// Computes cache statistics relative to `now` (epoch millis).
    #[must_use]
    pub fn stats(&self, now: u64) -> CacheStats {
        CacheStats {
            count: self.len(),
            oldest_age_ms: self
                .oldest_timestamp()
                .map(|oldest| now.saturating_sub(oldest)),
            estimated_size_bytes: self.rows.iter().map(StoredRow::estimated_size).sum(),
        }
    }
}
