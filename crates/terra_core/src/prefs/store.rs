//! Persistent preferences store.

use super::{HistoryEntry, Preferences, RecentEntry, Toggles};
use crate::clock::now_millis;
use crate::config::{Config, PREFERENCES_FILE};
use crate::error::CoreResult;
use crate::query::{SearchFilters, SortOrder};
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use terra_storage::{FileBackend, InMemoryBackend, StorageBackend};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Stores user preferences as one JSON document.
///
/// Every update is a read-modify-write under a single lock: the next
/// document is derived from the last committed one, persisted, and then
/// published to subscribers. Concurrent updates therefore cannot race past
/// the history and recently-viewed bounds.
pub struct PreferencesStore {
    backend: Mutex<Box<dyn StorageBackend>>,
    state: watch::Sender<Arc<Preferences>>,
    history_limit: usize,
    recent_limit: usize,
}

impl PreferencesStore {
    /// Opens a store over `backend`.
    ///
    /// A missing document yields defaults. An unreadable document is
    /// logged and replaced by defaults on the next update.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: Box<dyn StorageBackend>, config: &Config) -> CoreResult<Self> {
        let mut prefs = match backend.load()? {
            None => Preferences::default(),
            Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|error| {
                warn!(%error, "discarding unreadable preferences");
                Preferences::default()
            }),
        };
        prefs.search_history.enforce(config.history_limit);
        prefs.recently_viewed.enforce(config.recent_limit);

        let (state, _rx) = watch::channel(Arc::new(prefs));
        Ok(Self {
            backend: Mutex::new(backend),
            state,
            history_limit: config.history_limit,
            recent_limit: config.recent_limit,
        })
    }

    /// Opens a file-backed store inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the document
    /// cannot be read.
    pub fn open_dir(dir: impl AsRef<Path>, config: &Config) -> CoreResult<Self> {
        let backend = FileBackend::open_with_create_dirs(&dir.as_ref().join(PREFERENCES_FILE))?
            .with_sync(config.sync_on_write);
        Self::open(Box::new(backend), config)
    }

    /// Creates an in-memory store with default preferences.
    #[must_use]
    pub fn in_memory(config: &Config) -> Self {
        let (state, _rx) = watch::channel(Arc::new(Preferences::default()));
        Self {
            backend: Mutex::new(Box::new(InMemoryBackend::new())),
            state,
            history_limit: config.history_limit,
            recent_limit: config.recent_limit,
        }
    }

    fn commit<R>(&self, update: impl FnOnce(&mut Preferences) -> R) -> CoreResult<R> {
        let mut backend = self.backend.lock();

        let current = Arc::clone(&self.state.borrow());
        let mut next = Preferences::clone(&current);
        let out = update(&mut next);
        if next == *current {
            return Ok(out);
        }

        let bytes = serde_json::to_vec(&next)?;
        if let Err(error) = backend.store(&bytes) {
            warn!(%error, "failed to persist preferences");
            return Err(error.into());
        }

        self.state.send_replace(Arc::new(next));
        debug!("committed preferences");
        Ok(out)
    }

    // Filters

    /// Replaces the saved filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_filters(&self, filters: SearchFilters) -> CoreResult<()> {
        self.commit(|prefs| prefs.filters = filters)
    }

    /// Replaces the selected categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_categories(&self, categories: BTreeSet<String>) -> CoreResult<()> {
        self.commit(|prefs| prefs.filters.categories = categories)
    }

    /// Replaces the selected subcategories.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_subcategories(&self, subcategories: BTreeSet<String>) -> CoreResult<()> {
        self.commit(|prefs| prefs.filters.subcategories = subcategories)
    }

    /// Sets the sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_sort(&self, sort: SortOrder) -> CoreResult<()> {
        self.commit(|prefs| prefs.filters.sort = sort)
    }

    /// Resets filters to name ascending with nothing selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn clear_filters(&self) -> CoreResult<()> {
        self.commit(|prefs| prefs.filters = SearchFilters::default())
    }

    // Search history

    /// Records a search. Blank queries are ignored and return `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn add_search(&self, query: &str) -> CoreResult<bool> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(false);
        }
        let entry = HistoryEntry {
            query: query.to_owned(),
            timestamp: now_millis(),
        };
        let cap = self.history_limit;
        self.commit(|prefs| prefs.search_history.upsert_front(entry, cap))?;
        Ok(true)
    }

    /// Removes a search from the history, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn remove_search(&self, query: &str) -> CoreResult<bool> {
        let query = query.trim();
        self.commit(|prefs| prefs.search_history.remove(query))
    }

    /// Empties the search history.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn clear_search_history(&self) -> CoreResult<()> {
        self.commit(|prefs| prefs.search_history.clear())
    }

    // Recently viewed

    /// Records a viewed record code. Blank codes are ignored and return
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn add_recent(&self, code: &str) -> CoreResult<bool> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Ok(false);
        }
        let entry = RecentEntry {
            code,
            timestamp: now_millis(),
        };
        let cap = self.recent_limit;
        self.commit(|prefs| prefs.recently_viewed.upsert_front(entry, cap))?;
        Ok(true)
    }

    /// Removes a code from the recently viewed list.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn remove_recent(&self, code: &str) -> CoreResult<bool> {
        let code = code.trim();
        self.commit(|prefs| prefs.recently_viewed.remove(code))
    }

    /// Empties the recently viewed list.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn clear_recent(&self) -> CoreResult<()> {
        self.commit(|prefs| prefs.recently_viewed.clear())
    }

    // Toggles

    /// Sets dark mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_dark_mode(&self, enabled: bool) -> CoreResult<()> {
        self.commit(|prefs| prefs.toggles.dark_mode = enabled)
    }

    /// Sets whether the recently viewed list is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn set_show_recently_viewed(&self, enabled: bool) -> CoreResult<()> {
        self.commit(|prefs| prefs.toggles.show_recently_viewed = enabled)
    }

    /// Resets every preference to its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted.
    pub fn clear_all(&self) -> CoreResult<()> {
        self.commit(|prefs| *prefs = Preferences::default())
    }

    // Reads

    /// The last committed preferences.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Preferences> {
        Arc::clone(&self.state.borrow())
    }

    /// Saved filters.
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        self.snapshot().filters.clone()
    }

    /// Search history, most recent first.
    #[must_use]
    pub fn search_history(&self) -> Vec<HistoryEntry> {
        self.snapshot().search_history.entries().to_vec()
    }

    /// Recently viewed records, most recent first.
    #[must_use]
    pub fn recently_viewed(&self) -> Vec<RecentEntry> {
        self.snapshot().recently_viewed.entries().to_vec()
    }

    /// Toggles.
    #[must_use]
    pub fn toggles(&self) -> Toggles {
        self.snapshot().toggles
    }

    /// History cap.
    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Recently viewed cap.
    #[must_use]
    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Subscribes to committed preferences.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Preferences>> {
        self.state.subscribe()
    }

    /// Stream of committed preferences, starting with the current ones.
    pub fn changes(&self) -> BoxStream<'static, Arc<Preferences>> {
        let rx = self.state.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let prefs = Arc::clone(&rx.borrow_and_update());
            Some((prefs, (rx, false)))
        })
        .boxed()
    }
}

impl std::fmt::Debug for PreferencesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesStore")
            .field("history_limit", &self.history_limit)
            .field("recent_limit", &self.recent_limit)
            .finish_non_exhaustive()
    }
}
