//! Remote source abstraction.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use terra_codec::WireRecord;

/// The authoritative source of the full catalog.
///
/// Implementations are stateless between calls and must be safe to call
/// repeatedly; every call returns a complete snapshot or an error.
#[async_trait]
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetches the full current catalog.
    async fn fetch_all(&self) -> SyncResult<Vec<WireRecord>>;
}

/// A scripted remote source for testing.
///
/// Queued responses are served first, one per call; after that every call
/// gets the default response. Without any response set, calls fail with a
/// network error.
#[derive(Debug, Default)]
pub struct MockRemoteSource {
    default_response: Mutex<Option<SyncResult<Vec<WireRecord>>>>,
    queued: Mutex<VecDeque<SyncResult<Vec<WireRecord>>>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockRemoteSource {
    /// Creates a mock with no response set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that always returns `records`.
    pub fn with_records(records: Vec<WireRecord>) -> Self {
        let mock = Self::new();
        mock.set_records(records);
        mock
    }

    /// Creates a mock that always fails with `error`.
    pub fn failing(error: SyncError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    /// Sets the default response to `records`.
    pub fn set_records(&self, records: Vec<WireRecord>) {
        *self.default_response.lock() = Some(Ok(records));
    }

    /// Sets the default response to `error`.
    pub fn set_error(&self, error: SyncError) {
        *self.default_response.lock() = Some(Err(error));
    }

    /// Queues a one-shot response served before the default.
    pub fn push_response(&self, response: SyncResult<Vec<WireRecord>>) {
        self.queued.lock().push_back(response);
    }

    /// Delays every call by `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of calls started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that returned a response.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> SyncResult<Vec<WireRecord>> {
        if let Some(response) = self.queued.lock().pop_front() {
            return response;
        }
        self.default_response
            .lock()
            .clone()
            .unwrap_or_else(|| Err(SyncError::network("no mock response set")))
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch_all(&self) -> SyncResult<Vec<WireRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.next_response();
        self.completed.fetch_add(1, Ordering::SeqCst);
        response
    }
}
