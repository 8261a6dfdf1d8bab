//! Synchronization engine.

use crate::error::{SyncError, SyncResult};
use crate::policy::CachePolicy;
use crate::remote::RemoteSource;
use crate::state::{Resource, SyncStats};
use crate::stream::{Emitter, ResourceStream};
use parking_lot::RwLock;
use std::sync::Arc;
use terra_codec::{decode_records, normalize_lookup_code, Record};
use terra_core::{now_millis, LocalStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Reconciles a [`RemoteSource`] with a [`LocalStore`] under a
/// [`CachePolicy`].
///
/// Each request runs on its own tokio task and reports through a
/// [`ResourceStream`]. Refreshes are serialized: two requests never fetch
/// and replace at the same time, and readers keep seeing the previous
/// snapshot until a replace completes.
pub struct SyncEngine<R: RemoteSource> {
    inner: Arc<Inner<R>>,
}

struct Inner<R> {
    remote: R,
    store: Arc<LocalStore>,
    refresh_lock: Mutex<()>,
    stats: RwLock<SyncStats>,
}

impl<R: RemoteSource> Clone for SyncEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RemoteSource> SyncEngine<R> {
    /// Creates an engine over `remote` and `store`.
    pub fn new(remote: R, store: Arc<LocalStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                store,
                refresh_lock: Mutex::new(()),
                stats: RwLock::new(SyncStats::default()),
            }),
        }
    }

    /// The remote source.
    pub fn remote(&self) -> &R {
        &self.inner.remote
    }

    /// The local store.
    pub fn store(&self) -> &Arc<LocalStore> {
        &self.inner.store
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.inner.stats.read().clone()
    }

    /// Fetches, decodes and stores a fresh catalog, returning the records
    /// written.
    ///
    /// # Errors
    ///
    /// Returns the remote, decode or store failure. The store is left
    /// untouched on any failure.
    pub async fn refresh(&self) -> SyncResult<Vec<Record>> {
        self.inner.refresh().await
    }

    /// Reads the catalog under `policy`.
    ///
    /// Must be called within a tokio runtime.
    pub fn fetch_catalog(&self, policy: CachePolicy) -> ResourceStream<Vec<Record>> {
        let inner = Arc::clone(&self.inner);
        ResourceStream::spawn(move |out| async move { inner.fetch_catalog(policy, out).await })
    }

    /// Looks up one record by 3-letter code or 2-letter short code under
    /// `policy`.
    ///
    /// Must be called within a tokio runtime.
    pub fn get_by_code(&self, code: &str, policy: CachePolicy) -> ResourceStream<Record> {
        let inner = Arc::clone(&self.inner);
        let code = code.to_owned();
        ResourceStream::spawn(move |out| async move { inner.get_by_code(code, policy, out).await })
    }
}

impl<R: RemoteSource> Inner<R> {
    async fn refresh(&self) -> SyncResult<Vec<Record>> {
        let _guard = self.refresh_lock.lock().await;

        let result = self.fetch_and_replace().await;
        let mut stats = self.stats.write();
        match &result {
            Ok(records) => {
                stats.refreshes_completed += 1;
                stats.last_record_count = records.len() as u64;
                stats.last_refresh_at = Some(now_millis());
                stats.last_error = None;
            }
            Err(error) => {
                stats.refresh_failures += 1;
                stats.last_error = Some(error.to_string());
            }
        }
        result
    }

    async fn fetch_and_replace(&self) -> SyncResult<Vec<Record>> {
        let wire = self.remote.fetch_all().await?;
        let records = decode_records(&wire)?;
        self.store.replace_all(&records)?;
        info!(count = records.len(), "catalog refreshed");
        Ok(records)
    }

    fn note_fallback(&self, policy: CachePolicy, error: &SyncError) {
        warn!(%policy, %error, "remote fetch failed, serving cached catalog");
        self.stats.write().fallbacks += 1;
    }

    /// Cached records, if the cache holds any.
    fn cached_records(&self) -> Option<Vec<Record>> {
        self.store
            .snapshot()
            .filter(|snapshot| !snapshot.is_empty())
            .map(|snapshot| snapshot.records().to_vec())
    }

    async fn fetch_catalog(&self, policy: CachePolicy, out: Emitter<Vec<Record>>) {
        if !out.emit(Resource::Loading).await {
            return;
        }
        debug!(%policy, network = policy.uses_network(), "fetching catalog");

        let last = match policy {
            CachePolicy::CacheFirst => {
                let cached = self.cached_records();
                let had_cache = cached.is_some();
                if let Some(records) = cached {
                    if !out.emit(Resource::Success(records)).await {
                        return;
                    }
                }
                match self.refresh().await {
                    Ok(fresh) => Some(Resource::Success(fresh)),
                    Err(error) if had_cache && error.is_recoverable() => {
                        self.note_fallback(policy, &error);
                        None
                    }
                    Err(error) => Some(Resource::Error(error)),
                }
            }
            CachePolicy::NetworkFirst => match self.refresh().await {
                Ok(fresh) => Some(Resource::Success(fresh)),
                Err(error) if error.is_recoverable() => match self.cached_records() {
                    Some(cached) => {
                        self.note_fallback(policy, &error);
                        Some(Resource::Success(cached))
                    }
                    None => Some(Resource::Error(error)),
                },
                Err(error) => Some(Resource::Error(error)),
            },
            CachePolicy::ForceRefresh => Some(match self.refresh().await {
                Ok(fresh) => Resource::Success(fresh),
                Err(error) => Resource::Error(error),
            }),
            CachePolicy::CacheOnly => Some(match self.store.snapshot() {
                Some(snapshot) => Resource::Success(snapshot.records().to_vec()),
                None => Resource::Error(SyncError::EmptyCache),
            }),
        };

        if let Some(state) = last {
            out.emit(state).await;
        }
    }

    async fn get_by_code(&self, code: String, policy: CachePolicy, out: Emitter<Record>) {
        if !out.emit(Resource::Loading).await {
            return;
        }

        let state = match normalize_lookup_code(&code) {
            None => Resource::Error(SyncError::Validation(format!(
                "record code must be 2 or 3 letters, got {code:?}"
            ))),
            Some(key) => match self.lookup(&key, policy).await {
                Ok(record) => Resource::Success(record),
                Err(error) => Resource::Error(error),
            },
        };
        out.emit(state).await;
    }

    async fn lookup(&self, key: &str, policy: CachePolicy) -> SyncResult<Record> {
        debug!(%policy, network = policy.uses_network(), key, "looking up record");
        let hit = || self.store.get_by_code(key);

        let found = match policy {
            CachePolicy::CacheOnly => {
                if !self.store.is_populated() {
                    return Err(SyncError::EmptyCache);
                }
                hit()
            }
            CachePolicy::CacheFirst => match hit() {
                Some(record) => Some(record),
                None => {
                    let had_cache = self.store.count() > 0;
                    match self.refresh().await {
                        Ok(_) => hit(),
                        Err(error) if had_cache && error.is_recoverable() => {
                            self.note_fallback(policy, &error);
                            None
                        }
                        Err(error) => return Err(error),
                    }
                }
            },
            CachePolicy::NetworkFirst => {
                let had_cache = self.store.count() > 0;
                match self.refresh().await {
                    Ok(_) => hit(),
                    Err(error) if had_cache && error.is_recoverable() => {
                        self.note_fallback(policy, &error);
                        hit()
                    }
                    Err(error) => return Err(error),
                }
            }
            CachePolicy::ForceRefresh => {
                self.refresh().await?;
                hit()
            }
        };

        found.ok_or_else(|| SyncError::not_found(key))
    }
}

impl<R: RemoteSource> std::fmt::Debug for SyncEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("store", &self.inner.store)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRemoteSource;
    use futures::StreamExt;
    use std::time::Duration;
    use terra_codec::{WireName, WireRecord};

    fn wire(code: &str, name: &str, capital: &str) -> WireRecord {
        WireRecord {
            name: Some(WireName {
                common: Some(name.into()),
                official: None,
            }),
            cca2: Some(code[..2].into()),
            cca3: Some(code.into()),
            capital: Some(vec![capital.into()]),
            ..WireRecord::default()
        }
    }

    fn remote_catalog() -> Vec<WireRecord> {
        vec![
            wire("PER", "Peru", "Lima"),
            wire("CHL", "Chile", "Santiago"),
            wire("FRA", "France", "Paris"),
        ]
    }

    fn cached_catalog() -> Vec<Record> {
        vec![Record::new("OLD", "Oldland")]
    }

    fn engine(mock: MockRemoteSource) -> SyncEngine<MockRemoteSource> {
        SyncEngine::new(mock, Arc::new(LocalStore::in_memory()))
    }

    fn engine_with_cache(mock: MockRemoteSource) -> SyncEngine<MockRemoteSource> {
        let engine = engine(mock);
        engine.store().replace_all(&cached_catalog()).unwrap();
        engine
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    async fn collect_states<T: Send + 'static>(stream: ResourceStream<T>) -> Vec<Resource<T>> {
        stream.collect().await
    }

    fn assert_single_loading<T>(states: &[Resource<T>]) {
        assert!(states[0].is_loading());
        assert_eq!(states.iter().filter(|s| s.is_loading()).count(), 1);
    }

    // Cache first

    #[tokio::test]
    async fn cache_first_emits_cached_then_fresh() {
        let engine = engine_with_cache(MockRemoteSource::with_records(remote_catalog()));
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheFirst)).await;

        assert_single_loading(&states);
        assert_eq!(states.len(), 3);
        assert_eq!(names(states[1].data().unwrap()), ["Oldland"]);
        assert_eq!(names(states[2].data().unwrap()), ["Peru", "Chile", "France"]);
        assert_eq!(engine.store().count(), 3);
    }

    #[tokio::test]
    async fn cache_first_failing_remote_ends_with_cached() {
        let engine = engine_with_cache(MockRemoteSource::failing(SyncError::Timeout));
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheFirst)).await;

        assert_single_loading(&states);
        assert_eq!(states.len(), 2);
        assert_eq!(names(states[1].data().unwrap()), ["Oldland"]);
        assert!(!states.iter().any(Resource::is_error));
        assert_eq!(engine.stats().fallbacks, 1);
    }

    #[tokio::test]
    async fn cache_first_empty_cache_failing_remote_errors() {
        let engine = engine(MockRemoteSource::failing(SyncError::http_status(500)));
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheFirst)).await;

        assert_single_loading(&states);
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].error(), Some(&SyncError::http_status(500)));
    }

    #[tokio::test]
    async fn cache_first_cleared_cache_counts_as_empty() {
        let engine = engine_with_cache(MockRemoteSource::failing(SyncError::Timeout));
        engine.store().clear_all().unwrap();

        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheFirst)).await;
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].error(), Some(&SyncError::Timeout));
    }

    // Network first

    #[tokio::test]
    async fn network_first_prefers_remote() {
        let engine = engine_with_cache(MockRemoteSource::with_records(remote_catalog()));
        let states = collect_states(engine.fetch_catalog(CachePolicy::NetworkFirst)).await;

        assert_single_loading(&states);
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].data().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn network_first_falls_back_to_cache() {
        let engine = engine_with_cache(MockRemoteSource::failing(SyncError::network("down")));
        let states = collect_states(engine.fetch_catalog(CachePolicy::NetworkFirst)).await;

        assert_eq!(states.len(), 2);
        assert_eq!(names(states[1].data().unwrap()), ["Oldland"]);
    }

    #[tokio::test]
    async fn network_first_without_cache_errors() {
        let engine = engine(MockRemoteSource::failing(SyncError::network("down")));
        let states = collect_states(engine.fetch_catalog(CachePolicy::NetworkFirst)).await;

        assert_eq!(states.len(), 2);
        assert!(states[1].is_error());
    }

    // Force refresh

    #[tokio::test]
    async fn force_refresh_never_serves_stale_data() {
        let engine = engine_with_cache(MockRemoteSource::failing(SyncError::Timeout));
        let states = collect_states(engine.fetch_catalog(CachePolicy::ForceRefresh)).await;

        assert_single_loading(&states);
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].error(), Some(&SyncError::Timeout));
        assert_eq!(names(&engine.store().get_all()), ["Oldland"]);
    }

    #[tokio::test]
    async fn force_refresh_replaces_store() {
        let engine = engine_with_cache(MockRemoteSource::with_records(remote_catalog()));
        let fresh = engine
            .fetch_catalog(CachePolicy::ForceRefresh)
            .settle()
            .await
            .unwrap();

        assert_eq!(fresh.len(), 3);
        assert!(engine.store().get_by_code("OLD").is_none());
        assert_eq!(engine.stats().refreshes_completed, 1);
        assert_eq!(engine.stats().last_record_count, 3);
    }

    // Cache only

    #[tokio::test]
    async fn cache_only_never_contacts_remote() {
        let mock = MockRemoteSource::with_records(remote_catalog());
        let engine = engine_with_cache(mock);
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheOnly)).await;

        assert_eq!(states.len(), 2);
        assert_eq!(names(states[1].data().unwrap()), ["Oldland"]);
        assert_eq!(engine.remote().call_count(), 0);
    }

    #[tokio::test]
    async fn cache_only_distinguishes_never_populated_from_cleared() {
        let engine = engine(MockRemoteSource::new());
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheOnly)).await;
        assert_eq!(states[1].error(), Some(&SyncError::EmptyCache));

        engine.store().clear_all().unwrap();
        let states = collect_states(engine.fetch_catalog(CachePolicy::CacheOnly)).await;
        assert_eq!(states[1], Resource::Success(Vec::new()));
    }

    // Decoding

    #[tokio::test]
    async fn undecodable_records_are_dropped() {
        let mut catalog = remote_catalog();
        catalog.push(WireRecord::default());
        let engine = engine(MockRemoteSource::with_records(catalog));

        let fresh = engine.refresh().await.unwrap();
        assert_eq!(fresh.len(), 3);
    }

    #[tokio::test]
    async fn nothing_decodable_is_decode_failure_and_keeps_cache() {
        let engine = engine_with_cache(MockRemoteSource::with_records(vec![
            WireRecord::default(),
            WireRecord::default(),
        ]));

        let error = engine.refresh().await.unwrap_err();
        assert!(matches!(error, SyncError::Decode(_)));
        assert_eq!(names(&engine.store().get_all()), ["Oldland"]);
        assert_eq!(engine.stats().refresh_failures, 1);
        assert!(engine.stats().last_error.is_some());
    }

    #[tokio::test]
    async fn repeated_refresh_is_idempotent() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        engine.refresh().await.unwrap();
        let first = engine.store().get_all();
        engine.refresh().await.unwrap();

        assert_eq!(engine.store().get_all(), first);
        assert_eq!(engine.store().count(), 3);
    }

    // Cancellation

    #[tokio::test]
    async fn cancelled_fetch_does_not_touch_store() {
        let mock = MockRemoteSource::with_records(remote_catalog());
        mock.set_delay(Duration::from_secs(60));
        let engine = engine_with_cache(mock);

        let mut stream = engine.fetch_catalog(CachePolicy::ForceRefresh);
        assert_eq!(stream.next().await, Some(Resource::Loading));

        while engine.remote().call_count() == 0 {
            tokio::task::yield_now().await;
        }
        stream.cancel();
        assert_eq!(stream.next().await, None);

        assert_eq!(engine.remote().completed_count(), 0);
        assert_eq!(names(&engine.store().get_all()), ["Oldland"]);
    }

    #[tokio::test]
    async fn concurrent_refreshes_are_serialized() {
        let mock = MockRemoteSource::with_records(remote_catalog());
        mock.set_delay(Duration::from_millis(20));
        let engine = engine(mock);

        let a = engine.fetch_catalog(CachePolicy::ForceRefresh);
        let b = engine.fetch_catalog(CachePolicy::ForceRefresh);
        let (a, b) = tokio::join!(a.settle(), b.settle());

        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 3);
        assert_eq!(engine.store().count(), 3);
        assert_eq!(engine.stats().refreshes_completed, 2);
    }

    // Lookup by code

    #[tokio::test]
    async fn get_by_code_validates_input() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        for bad in ["", "P", "PERU", "P3R"] {
            let result = engine.get_by_code(bad, CachePolicy::CacheFirst).settle().await;
            assert!(matches!(result, Err(SyncError::Validation(_))), "{bad}");
        }
        assert_eq!(engine.remote().call_count(), 0);
    }

    #[tokio::test]
    async fn get_by_code_cache_hit_skips_network() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        engine.refresh().await.unwrap();

        let states = collect_states(engine.get_by_code("pe", CachePolicy::CacheFirst)).await;
        assert_single_loading(&states);
        assert_eq!(states[1].data().unwrap().name, "Peru");
        assert_eq!(engine.remote().call_count(), 1);
    }

    #[tokio::test]
    async fn get_by_code_cache_miss_refreshes() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        let record = engine
            .get_by_code("fra", CachePolicy::CacheFirst)
            .settle()
            .await
            .unwrap();
        assert_eq!(record.capital, "Paris");
    }

    #[tokio::test]
    async fn get_by_code_not_found() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        let result = engine
            .get_by_code("XYZ", CachePolicy::NetworkFirst)
            .settle()
            .await;
        assert_eq!(result, Err(SyncError::not_found("XYZ")));
    }

    #[tokio::test]
    async fn get_by_code_cache_only() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        let result = engine.get_by_code("PER", CachePolicy::CacheOnly).settle().await;
        assert_eq!(result, Err(SyncError::EmptyCache));

        engine.refresh().await.unwrap();
        let record = engine
            .get_by_code("PER", CachePolicy::CacheOnly)
            .settle()
            .await
            .unwrap();
        assert_eq!(record.name, "Peru");
    }

    #[tokio::test]
    async fn get_by_code_network_first_falls_back() {
        let engine = engine(MockRemoteSource::with_records(remote_catalog()));
        engine.refresh().await.unwrap();
        engine.remote().set_error(SyncError::Timeout);

        let record = engine
            .get_by_code("CHL", CachePolicy::NetworkFirst)
            .settle()
            .await
            .unwrap();
        assert_eq!(record.name, "Chile");

        let result = engine.get_by_code("CHL", CachePolicy::ForceRefresh).settle().await;
        assert_eq!(result, Err(SyncError::Timeout));
    }
}
