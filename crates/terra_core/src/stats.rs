//! Cache statistics.
//!
//! Stats are derived on demand from the current snapshot and never persisted.

use serde::Serialize;

/// Statistics about the cached catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Number of cached records.
    pub count: usize,
    /// Age of the oldest row in milliseconds, `None` when the cache is empty.
    pub oldest_age_ms: Option<u64>,
    /// Approximate size of the cached rows in bytes.
    pub estimated_size_bytes: u64,
}

impl CacheStats {
    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
