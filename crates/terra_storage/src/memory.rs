//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory storage backend.
///
/// This backend keeps the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral caches that don't need to survive a restart
///
/// Writes can be made to fail on demand with [`InMemoryBackend::fail_writes`],
/// which lets callers exercise their persistence error paths.
///
/// # Example
///
/// ```rust
/// use terra_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.store(b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
    reject_writes: AtomicBool,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend holding a pre-existing blob.
    ///
    /// Useful for testing recovery from previously persisted (or corrupted)
    /// snapshots.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Returns a copy of the stored blob, if any.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Makes every subsequent `store`/`clear` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.reject_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected(
                "in-memory backend is failing writes".into(),
            ));
        }
        Ok(())
    }
}

impl StorageBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn store(&mut self, data: &[u8]) -> StorageResult<()> {
        self.check_writable()?;
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.check_writable()?;
        *self.data.write() = None;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().as_ref().map_or(0, |d| d.len() as u64))
    }
}
