//! Snapshot change feed.
//!
//! The feed holds the current snapshot pointer and distributes every
//! committed replacement to subscribers. Subscribers only ever see whole
//! snapshots, in commit order; a slow subscriber skips intermediate states
//! but always converges on the latest one.

use crate::store::Snapshot;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Current catalog state: `None` until the store is first populated.
pub type SnapshotState = Option<Arc<Snapshot>>;

/// Distributes committed snapshots to subscribers.
pub struct SnapshotFeed {
    tx: watch::Sender<SnapshotState>,
    sequence: AtomicU64,
}

impl SnapshotFeed {
    /// Creates a feed starting at `initial`.
    #[must_use]
    pub fn new(initial: SnapshotState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns the current snapshot pointer.
    #[must_use]
    pub fn current(&self) -> SnapshotState {
        self.tx.borrow().clone()
    }

    /// Publishes a new committed state and returns its commit sequence.
    ///
    /// Must only be called after the state has been persisted.
    pub fn publish(&self, state: SnapshotState) -> u64 {
        self.tx.send_replace(state);
        self.sequence.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of states published since the feed was created.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Subscribes to committed states.
    ///
    /// The receiver starts at the current state, already marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.tx.subscribe()
    }

    /// Number of live subscribers, including live query streams.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Creates a live query: a stream that yields `project(current)` right
    /// away and again after each committed change.
    ///
    /// The stream ends when the feed is dropped.
    pub fn live<T, F>(&self, project: F) -> BoxStream<'static, T>
    where
        T: Send + 'static,
        F: Fn(Option<&Snapshot>) -> T + Send + Sync + 'static,
    {
        let rx = self.tx.subscribe();
        stream::unfold((rx, project, true), |(mut rx, project, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let value = {
                let current = rx.borrow_and_update();
                project(current.as_deref())
            };
            Some((value, (rx, project, false)))
        })
        .boxed()
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for SnapshotFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotFeed")
            .field("populated", &self.tx.borrow().is_some())
            .field("sequence", &self.sequence())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
