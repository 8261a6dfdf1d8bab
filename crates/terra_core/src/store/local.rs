//! The local store: last-known-good catalog snapshot.

use super::row::StoredRow;
use super::snapshot::Snapshot;
use crate::clock::now_millis;
use crate::config::{Config, SNAPSHOT_FILE};
use crate::error::CoreResult;
use crate::feed::{SnapshotFeed, SnapshotState};
use crate::query;
use crate::stats::CacheStats;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use terra_codec::{from_cbor, to_cbor, Record};
use terra_storage::{FileBackend, InMemoryBackend, StorageBackend};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// On-disk snapshot format version.
const FORMAT_VERSION: u16 = 1;

#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    format_version: u16,
    rows: &'a [StoredRow],
}

#[derive(Deserialize)]
struct SnapshotFile {
    format_version: u16,
    rows: Vec<StoredRow>,
}

/// Holds the catalog snapshot and persists it through a storage backend.
///
/// Writes (`replace_all`, `clear_all`, `reset`) are serialized by a single
/// writer lock: the new snapshot is built in full, persisted, and only then
/// published. Reads never take the writer lock; they clone the current
/// snapshot pointer and compute on it.
pub struct LocalStore {
    backend: Mutex<Box<dyn StorageBackend>>,
    feed: SnapshotFeed,
}

impl LocalStore {
    /// Opens a store over `backend`, loading any persisted snapshot.
    ///
    /// A persisted snapshot that cannot be decoded is discarded and the
    /// store starts unpopulated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let initial = match backend.load()? {
            None => None,
            Some(bytes) => decode_snapshot(&bytes).map(Arc::new),
        };

        if let Some(snapshot) = &initial {
            debug!(count = snapshot.len(), "loaded catalog snapshot");
        }

        Ok(Self {
            backend: Mutex::new(backend),
            feed: SnapshotFeed::new(initial),
        })
    }

    /// Opens a file-backed store inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the snapshot
    /// file cannot be read.
    pub fn open_dir(dir: impl AsRef<Path>, config: &Config) -> CoreResult<Self> {
        let backend = FileBackend::open_with_create_dirs(&dir.as_ref().join(SNAPSHOT_FILE))?
            .with_sync(config.sync_on_write);
        Self::open(Box::new(backend))
    }

    /// Creates an empty, never-populated in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Mutex::new(Box::new(InMemoryBackend::new())),
            feed: SnapshotFeed::default(),
        }
    }

    /// Atomically replaces the whole catalog, stamping rows with the
    /// current time. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or persisting fails; the previous
    /// snapshot then stays in place.
    pub fn replace_all(&self, records: &[Record]) -> CoreResult<usize> {
        self.replace_all_at(records, now_millis())
    }

    /// Same as [`replace_all`](Self::replace_all) with an explicit stamp.
    ///
    /// # Errors
    ///
    /// See [`replace_all`](Self::replace_all).
    pub fn replace_all_at(&self, records: &[Record], last_updated: u64) -> CoreResult<usize> {
        let rows = records
            .iter()
            .map(|record| StoredRow::from_record(record, last_updated))
            .collect::<CoreResult<Vec<_>>>()?;
        let snapshot = Snapshot::from_rows(rows);
        let count = snapshot.len();

        self.commit(snapshot)?;
        info!(count, "replaced catalog snapshot");
        Ok(count)
    }

    /// Removes every row. The store stays populated (with zero rows).
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn clear_all(&self) -> CoreResult<()> {
        self.commit(Snapshot::empty())?;
        info!("cleared catalog snapshot");
        Ok(())
    }

    /// Forgets the catalog entirely, returning to the never-populated state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be cleared.
    pub fn reset(&self) -> CoreResult<()> {
        let mut backend = self.backend.lock();
        backend.clear()?;
        self.feed.publish(None);
        info!("reset catalog store");
        Ok(())
    }

    fn commit(&self, snapshot: Snapshot) -> CoreResult<()> {
        let bytes = to_cbor(&SnapshotFileRef {
            format_version: FORMAT_VERSION,
            rows: snapshot.rows(),
        })?;

        let mut backend = self.backend.lock();
        backend.store(&bytes)?;
        self.feed.publish(Some(Arc::new(snapshot)));
        Ok(())
    }

    /// The current snapshot, `None` if never populated.
    #[must_use]
    pub fn snapshot(&self) -> SnapshotState {
        self.feed.current()
    }

    /// Whether a snapshot has ever been committed (and not reset).
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.feed.current().is_some()
    }

    /// All records in store order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Record> {
        self.read(|snapshot| snapshot.records().to_vec())
    }

    /// Looks up a record by 3-letter code or 2-letter short code.
    #[must_use]
    pub fn get_by_code(&self, code: &str) -> Option<Record> {
        self.snapshot()
            .and_then(|snapshot| snapshot.get(code).cloned())
    }

    /// Records whose name or capital contains `query`, ignoring case.
    #[must_use]
    pub fn search_by_text(&self, query: &str) -> Vec<Record> {
        self.read(|snapshot| query::search_text(snapshot.records(), query))
    }

    /// Records in `category`, ignoring case.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<Record> {
        self.read(|snapshot| query::filter_category(snapshot.records(), category))
    }

    /// Number of stored rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read(Snapshot::len)
    }

    /// Oldest `last_updated` stamp, `None` if the store is empty.
    #[must_use]
    pub fn oldest_timestamp(&self) -> Option<u64> {
        self.snapshot()
            .and_then(|snapshot| snapshot.oldest_timestamp())
    }

    /// Cache statistics as of now.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats_at(now_millis())
    }

    /// Cache statistics relative to `now` (epoch millis).
    #[must_use]
    pub fn stats_at(&self, now: u64) -> CacheStats {
        self.snapshot()
            .map(|snapshot| snapshot.stats(now))
            .unwrap_or_default()
    }

    /// Size of the persisted snapshot in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size.
    pub fn persisted_size(&self) -> CoreResult<u64> {
        Ok(self.backend.lock().size()?)
    }

    /// Subscribes to committed snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.feed.subscribe()
    }

    /// Live view of all records.
    pub fn watch_all(&self) -> BoxStream<'static, Vec<Record>> {
        self.feed
            .live(|snapshot| snapshot.map(|s| s.records().to_vec()).unwrap_or_default())
    }

    /// Live text search.
    pub fn watch_search(&self, query: impl Into<String>) -> BoxStream<'static, Vec<Record>> {
        let query = query.into();
        self.feed.live(move |snapshot| {
            snapshot
                .map(|s| query::search_text(s.records(), &query))
                .unwrap_or_default()
        })
    }

    /// Live category filter.
    pub fn watch_category(&self, category: impl Into<String>) -> BoxStream<'static, Vec<Record>> {
        let category = category.into();
        self.feed.live(move |snapshot| {
            snapshot
                .map(|s| query::filter_category(s.records(), &category))
                .unwrap_or_default()
        })
    }

    /// Live lookup by code.
    pub fn watch_code(&self, code: impl Into<String>) -> BoxStream<'static, Option<Record>> {
        let code = code.into();
        self.feed
            .live(move |snapshot| snapshot.and_then(|s| s.get(&code).cloned()))
    }

    fn read<T: Default>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        self.snapshot()
            .map(|snapshot| f(snapshot.as_ref()))
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}

fn decode_snapshot(bytes: &[u8]) -> Option<Snapshot> {
    match from_cbor::<SnapshotFile>(bytes) {
        Ok(file) if file.format_version == FORMAT_VERSION => Some(Snapshot::from_rows(file.rows)),
        Ok(file) => {
            warn!(
                found = file.format_version,
                expected = FORMAT_VERSION,
                "discarding catalog snapshot with unknown format version"
            );
            None
        }
        Err(error) => {
            warn!(%error, "discarding unreadable catalog snapshot");
            None
        }
    }
}
