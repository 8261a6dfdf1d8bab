//! # Terra Core
//!
//! Local state of the Terra catalog cache.
//!
//! This crate provides:
//! - [`LocalStore`]: the last-known-good catalog snapshot, replaced only as a
//!   whole and persisted through a [`terra_storage::StorageBackend`]
//! - The query layer: text search, category filters and sort orders over a
//!   snapshot ([`query`]), plus live query streams that re-emit after every
//!   committed change
//! - [`suggest`]: prefix suggestions over names and capitals
//! - [`PreferencesStore`]: saved filters, bounded search history, bounded
//!   recently-viewed list and toggles, with change notification
//!
//! ## Key Invariants
//!
//! - The stored catalog is either never populated or a complete snapshot
//! - Readers observe the old snapshot or the new one, never a mix
//! - Bounded lists never exceed their cap and never hold two keys that are
//!   equal ignoring case

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod feed;
mod prefs;
pub mod query;
mod stats;
mod store;
mod suggest;

pub use clock::now_millis;
pub use config::{Config, PREFERENCES_FILE, SNAPSHOT_FILE};
pub use error::{CoreError, CoreResult};
pub use feed::{SnapshotFeed, SnapshotState};
pub use prefs::{
    BoundedEntry, BoundedList, HistoryEntry, Preferences, PreferencesStore, RecentEntry, Toggles,
};
pub use query::{SearchFilters, SortOrder};
pub use stats::CacheStats;
pub use store::{LocalStore, Snapshot, StoredRow};
pub use suggest::suggest;

pub use terra_codec::{Currency, Language, Record};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
