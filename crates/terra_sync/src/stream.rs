//! Cancellable request streams.

use crate::error::{SyncError, SyncResult};
use crate::state::Resource;
use futures::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// States buffered between the producing task and the consumer.
const CHANNEL_CAPACITY: usize = 4;

/// Sending half handed to the task that produces a request's states.
pub(crate) struct Emitter<T> {
    tx: mpsc::Sender<Resource<T>>,
}

impl<T> Emitter<T> {
    /// Sends a state. Returns `false` once the consumer is gone.
    pub(crate) async fn emit(&self, state: Resource<T>) -> bool {
        self.tx.send(state).await.is_ok()
    }
}

/// The ordered states of one request.
///
/// The stream owns the task producing its states. Calling
/// [`cancel`](Self::cancel) or dropping the stream aborts that task, which
/// drops any in-flight remote call before its result reaches the store.
///
/// If the producing task dies before reaching a settled state, the stream
/// yields a final `Error(Cancelled)` instead of ending in `Loading`.
pub struct ResourceStream<T> {
    rx: mpsc::Receiver<Resource<T>>,
    task: JoinHandle<()>,
    settled: bool,
    cancelled: bool,
    finished: bool,
}

impl<T: Send + 'static> ResourceStream<T> {
    /// Spawns `produce` on the current tokio runtime.
    pub(crate) fn spawn<F, Fut>(produce: F) -> Self
    where
        F: FnOnce(Emitter<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(produce(Emitter { tx }));
        Self {
            rx,
            task,
            settled: false,
            cancelled: false,
            finished: false,
        }
    }
}

impl<T> ResourceStream<T> {
    /// Stops the request. States already buffered are still delivered.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.task.abort();
        self.rx.close();
    }

    /// Whether [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Drains the stream and returns its final state as a result.
    ///
    /// # Errors
    ///
    /// Returns the request's terminal error, or [`SyncError::Cancelled`]
    /// if it produced nothing.
    pub async fn settle(mut self) -> SyncResult<T> {
        let mut last = None;
        while let Some(state) = self.next().await {
            last = Some(state);
        }
        last.map_or(Err(SyncError::Cancelled), Resource::into_result)
    }
}

impl<T> Stream for ResourceStream<T> {
    type Item = Resource<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.finished {
            return Poll::Ready(None);
        }

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(state)) => {
                this.settled = !state.is_loading();
                Poll::Ready(Some(state))
            }
            Poll::Ready(None) => {
                this.finished = true;
                if this.settled || this.cancelled {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Resource::Error(SyncError::Cancelled)))
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for ResourceStream<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> std::fmt::Debug for ResourceStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStream")
            .field("settled", &self.settled)
            .field("cancelled", &self.cancelled)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn yields_states_in_order() {
        let stream = ResourceStream::spawn(|out| async move {
            out.emit(Resource::Loading).await;
            out.emit(Resource::Success(1)).await;
            out.emit(Resource::Success(2)).await;
        });

        let states: Vec<_> = stream.collect().await;
        assert_eq!(
            states,
            [Resource::Loading, Resource::Success(1), Resource::Success(2)]
        );
    }

    #[tokio::test]
    async fn settle_returns_last_state() {
        let stream = ResourceStream::spawn(|out| async move {
            out.emit(Resource::Loading).await;
            out.emit(Resource::<u8>::Error(SyncError::EmptyCache)).await;
        });
        assert_eq!(stream.settle().await, Err(SyncError::EmptyCache));
    }

    #[tokio::test]
    async fn unsettled_producer_ends_with_cancelled() {
        let stream = ResourceStream::spawn(|out| async move {
            out.emit(Resource::<u8>::Loading).await;
        });

        let states: Vec<_> = stream.collect().await;
        assert_eq!(
            states,
            [Resource::Loading, Resource::Error(SyncError::Cancelled)]
        );
    }

    #[tokio::test]
    async fn cancel_aborts_producer() {
        let mut stream = ResourceStream::spawn(|out| async move {
            out.emit(Resource::Loading).await;
            tokio::time::sleep(Duration::from_secs(60)).await;
            out.emit(Resource::Success(1u8)).await;
        });

        assert_eq!(stream.next().await, Some(Resource::Loading));
        stream.cancel();
        assert!(stream.is_cancelled());
        assert_eq!(stream.next().await, None);
    }
}
