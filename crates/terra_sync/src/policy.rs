//! Cache policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a request weighs cached data against the remote source.
///
/// Policies are chosen per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Serve the cache immediately, then refresh from the remote source.
    /// Remote failures are silent when cached data was served.
    #[default]
    CacheFirst,
    /// Try the remote source first; fall back to non-empty cached data.
    NetworkFirst,
    /// Always go to the remote source; never serve cached data.
    ForceRefresh,
    /// Never contact the remote source.
    CacheOnly,
}

impl CachePolicy {
    /// All policies.
    pub const ALL: [CachePolicy; 4] = [
        CachePolicy::CacheFirst,
        CachePolicy::NetworkFirst,
        CachePolicy::ForceRefresh,
        CachePolicy::CacheOnly,
    ];

    /// Stable textual name, e.g. `"cache-first"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            CachePolicy::CacheFirst => "cache-first",
            CachePolicy::NetworkFirst => "network-first",
            CachePolicy::ForceRefresh => "force-refresh",
            CachePolicy::CacheOnly => "cache-only",
        }
    }

    /// Whether the policy may contact the remote source.
    pub const fn uses_network(self) -> bool {
        !matches!(self, CachePolicy::CacheOnly)
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        CachePolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown cache policy: {s}"))
    }
}
