//! Request states and engine statistics.

use crate::error::{SyncError, SyncResult};
use serde::Serialize;

/// One state of a catalog request.
///
/// A request stream yields exactly one `Loading` first, then zero or more
/// `Success` values, and ends after its last `Success` or a single `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    /// The request has started.
    Loading,
    /// Data is available. Under cache-first a cached `Success` may be
    /// followed by a fresh one.
    Success(T),
    /// The request failed. Always the final state.
    Error(SyncError),
}

impl<T> Resource<T> {
    /// Returns true for `Loading`.
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    /// Returns true for `Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    /// The data, if this is a `Success`.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error, if this is an `Error`.
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Resource::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Maps the data of a `Success`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(error) => Resource::Error(error),
        }
    }

    /// Converts a settled state into a result. `Loading` reads as
    /// cancelled.
    pub fn into_result(self) -> SyncResult<T> {
        match self {
            Resource::Success(data) => Ok(data),
            Resource::Error(error) => Err(error),
            Resource::Loading => Err(SyncError::Cancelled),
        }
    }
}

/// Statistics about engine activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Refreshes that replaced the local snapshot.
    pub refreshes_completed: u64,
    /// Refreshes that failed.
    pub refresh_failures: u64,
    /// Remote failures answered from the cache instead.
    pub fallbacks: u64,
    /// Records written by the last successful refresh.
    pub last_record_count: u64,
    /// Time of the last successful refresh, epoch millis.
    pub last_refresh_at: Option<u64>,
    /// Message of the last failure.
    pub last_error: Option<String>,
}
