//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-blob snapshot store.
///
/// Backends hold a single opaque byte blob. The catalog store keeps its
/// encoded snapshot in one backend and the preferences store keeps its JSON
/// document in another; neither backend knows what the bytes mean.
///
/// # Invariants
///
/// - `load` returns `None` until the first successful `store`, and again
///   after `clear`
/// - `store` replaces the whole blob atomically; a failed `store` leaves the
///   previous blob intact
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Loads the current blob.
    ///
    /// Returns `None` if nothing has been stored (or the blob was cleared).
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be read.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Atomically replaces the stored blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new blob cannot be written. The previous blob
    /// is still readable in that case.
    fn store(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Removes the stored blob.
    ///
    /// Clearing an empty backend is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be removed.
    fn clear(&mut self) -> StorageResult<()>;

    /// Returns the size of the stored blob in bytes (0 when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
