//! The catalog facade handed to UI collaborators.

use crate::config::SyncConfig;
use crate::engine::SyncEngine;
use crate::error::SyncResult;
use crate::http::HttpRemoteSource;
use crate::policy::CachePolicy;
use crate::remote::RemoteSource;
use crate::state::SyncStats;
use crate::stream::ResourceStream;
use futures::stream::BoxStream;
use std::path::Path;
use std::sync::Arc;
use terra_core::{
    query, suggest, CacheStats, Config, LocalStore, PreferencesStore, Record, SearchFilters,
};
use tracing::info;

/// Everything a UI collaborator needs: catalog reads under a cache policy,
/// live queries, suggestions, cache maintenance and preferences.
///
/// The catalog store and the preferences store are constructed once and
/// owned here; they have independent lifecycles (clearing the cache never
/// touches preferences).
pub struct Catalog<R: RemoteSource> {
    engine: SyncEngine<R>,
    store: Arc<LocalStore>,
    prefs: Arc<PreferencesStore>,
}

impl Catalog<HttpRemoteSource> {
    /// Opens a file-backed catalog in `dir` that syncs over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be opened or the HTTP
    /// client cannot be built.
    pub fn open(dir: impl AsRef<Path>, config: &Config, sync: &SyncConfig) -> SyncResult<Self> {
        let remote = HttpRemoteSource::new(sync)?;
        Self::open_with(dir, config, remote)
    }
}

impl<R: RemoteSource> Catalog<R> {
    /// Opens a file-backed catalog in `dir` over `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be opened.
    pub fn open_with(dir: impl AsRef<Path>, config: &Config, remote: R) -> SyncResult<Self> {
        let dir = dir.as_ref();
        let store = Arc::new(LocalStore::open_dir(dir, config)?);
        let prefs = Arc::new(PreferencesStore::open_dir(dir, config)?);
        info!(path = %dir.display(), cached = store.count(), "opened catalog");
        Ok(Self::from_parts(remote, store, prefs))
    }

    /// Creates a catalog with in-memory stores.
    pub fn in_memory(config: &Config, remote: R) -> Self {
        Self::from_parts(
            remote,
            Arc::new(LocalStore::in_memory()),
            Arc::new(PreferencesStore::in_memory(config)),
        )
    }

    /// Assembles a catalog from existing parts.
    pub fn from_parts(remote: R, store: Arc<LocalStore>, prefs: Arc<PreferencesStore>) -> Self {
        Self {
            engine: SyncEngine::new(remote, Arc::clone(&store)),
            store,
            prefs,
        }
    }

    /// The sync engine.
    pub fn engine(&self) -> &SyncEngine<R> {
        &self.engine
    }

    /// The local store.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// The preferences store.
    pub fn preferences(&self) -> &PreferencesStore {
        &self.prefs
    }

    /// Reads the catalog under `policy`.
    pub fn fetch_catalog(&self, policy: CachePolicy) -> ResourceStream<Vec<Record>> {
        self.engine.fetch_catalog(policy)
    }

    /// Looks up one record under `policy`.
    pub fn get_by_code(&self, code: &str, policy: CachePolicy) -> ResourceStream<Record> {
        self.engine.get_by_code(code, policy)
    }

    /// Looks up one record (cache first) and records it as recently viewed.
    ///
    /// # Errors
    ///
    /// Returns the lookup failure, or a store error if the recently viewed
    /// list cannot be updated.
    pub async fn view(&self, code: &str) -> SyncResult<Record> {
        let record = self
            .engine
            .get_by_code(code, CachePolicy::CacheFirst)
            .settle()
            .await?;
        self.prefs.add_recent(&record.code)?;
        Ok(record)
    }

    /// Live text search over names and capitals.
    pub fn search_by_text(&self, query: &str) -> BoxStream<'static, Vec<Record>> {
        self.store.watch_search(query)
    }

    /// Live category filter.
    pub fn filter_by_category(&self, category: &str) -> BoxStream<'static, Vec<Record>> {
        self.store.watch_category(category)
    }

    /// Live view of the whole catalog.
    pub fn watch_all(&self) -> BoxStream<'static, Vec<Record>> {
        self.store.watch_all()
    }

    /// Text search narrowed and sorted by `filters`.
    pub fn browse(&self, query: &str, filters: &SearchFilters) -> Vec<Record> {
        filters.apply(&self.store.search_by_text(query))
    }

    /// Text search narrowed and sorted by the saved filters.
    pub fn browse_saved(&self, query: &str) -> Vec<Record> {
        self.browse(query, &self.prefs.filters())
    }

    /// Distinct categories in the cache.
    pub fn categories(&self) -> Vec<String> {
        self.store
            .snapshot()
            .map(|snapshot| query::categories(snapshot.records()))
            .unwrap_or_default()
    }

    /// Distinct subcategories in the cache.
    pub fn subcategories(&self) -> Vec<String> {
        self.store
            .snapshot()
            .map(|snapshot| query::subcategories(snapshot.records()))
            .unwrap_or_default()
    }

    /// Prefix suggestions over cached names and capitals.
    pub fn suggest(&self, query: &str, max_suggestions: usize) -> Vec<String> {
        self.store
            .snapshot()
            .map(|snapshot| suggest(query, snapshot.records(), max_suggestions))
            .unwrap_or_default()
    }

    /// Cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Engine statistics.
    pub fn sync_stats(&self) -> SyncStats {
        self.engine.stats()
    }

    /// Removes every cached record. Preferences are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cache cannot be persisted.
    pub fn clear_cache(&self) -> SyncResult<()> {
        self.store.clear_all()?;
        Ok(())
    }
}

impl<R: RemoteSource> std::fmt::Debug for Catalog<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("store", &self.store)
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}
