//! Configuration for the remote source client.

use std::time::Duration;

/// Default catalog endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested from the catalog endpoint by default.
pub const DEFAULT_FIELDS: [&str; 13] = [
    "name",
    "cca2",
    "cca3",
    "capital",
    "region",
    "subregion",
    "population",
    "languages",
    "currencies",
    "latlng",
    "idd",
    "area",
    "flags",
];

/// Configuration for fetching the remote catalog.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Endpoint base URL, without the `/all` path.
    pub base_url: String,
    /// Field projection; empty requests every field.
    pub fields: Vec<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent sent with requests.
    pub user_agent: String,
}

impl SyncConfig {
    /// Creates a configuration for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            timeout: Duration::from_secs(30),
            user_agent: format!("terra/{}", terra_core::VERSION),
        }
    }

    /// Sets the field projection.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full URL of the catalog request.
    pub fn catalog_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.fields.is_empty() {
            format!("{base}/all")
        } else {
            format!("{base}/all?fields={}", self.fields.join(","))
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
