//! Local store and preferences configuration.

/// File name of the catalog snapshot inside a data directory.
pub const SNAPSHOT_FILE: &str = "catalog.snapshot";

/// File name of the preferences document inside a data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Configuration for opening the local stores.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of search history entries.
    pub history_limit: usize,

    /// Maximum number of recently viewed entries.
    pub recent_limit: usize,

    /// Whether every commit is synced to disk (safer but slower).
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: 10,
            recent_limit: 20,
            sync_on_write: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search history cap.
    #[must_use]
    pub const fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Sets the recently viewed cap.
    #[must_use]
    pub const fn recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Sets whether commits are synced to disk.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}
