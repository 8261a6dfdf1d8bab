//! User preferences: saved filters, search history, recently viewed, toggles.

mod bounded;
mod store;

pub use bounded::{BoundedEntry, BoundedList};
pub use store::PreferencesStore;

use crate::query::SearchFilters;
use serde::{Deserialize, Serialize};

/// A past search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Trimmed query text.
    pub query: String,
    /// When the search was recorded, epoch millis.
    pub timestamp: u64,
}

impl BoundedEntry for HistoryEntry {
    fn key(&self) -> &str {
        &self.query
    }
}

/// A recently viewed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// Record code, uppercase.
    pub code: String,
    /// When the record was viewed, epoch millis.
    pub timestamp: u64,
}

impl BoundedEntry for RecentEntry {
    fn key(&self) -> &str {
        &self.code
    }
}

/// Simple on/off settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Dark theme.
    pub dark_mode: bool,
    /// Whether the recently viewed list is shown.
    pub show_recently_viewed: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            dark_mode: false,
            show_recently_viewed: true,
        }
    }
}

/// The whole preferences document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Saved search filters.
    pub filters: SearchFilters,
    /// Search history, most recent first.
    pub search_history: BoundedList<HistoryEntry>,
    /// Recently viewed records, most recent first.
    pub recently_viewed: BoundedList<RecentEntry>,
    /// Toggles.
    pub toggles: Toggles,
}
