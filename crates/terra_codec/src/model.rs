//! Canonical domain record.

use serde::{Deserialize, Serialize};

/// A language entry of a record.
///
/// Sub-fields stay optional: the column encoding must reproduce a `null`
/// exactly as it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    /// ISO 639-3 language code.
    pub code: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

impl Language {
    /// Creates a language entry with both fields present.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
        }
    }
}

/// A currency entry of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    /// ISO 4217 currency code.
    pub code: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Currency symbol.
    pub symbol: Option<String>,
}

impl Currency {
    /// Creates a currency entry with every field present.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
            symbol: Some(symbol.into()),
        }
    }
}

/// A catalog record (a country).
///
/// `code` is the stable identity: three ASCII letters, uppercase. Every
/// other field is defaulted when upstream omits it, so nothing here is ever
/// null: absent text is an empty string, absent lists are empty, absent
/// numbers are zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Unique 3-letter code (uppercase).
    pub code: String,
    /// 2-letter code (uppercase), empty when unknown.
    pub short_code: String,
    /// Common name.
    pub name: String,
    /// Category (region).
    pub category: String,
    /// Subcategory (subregion).
    pub subcategory: String,
    /// Spoken languages.
    pub languages: Vec<Language>,
    /// Currencies in use.
    pub currencies: Vec<Currency>,
    /// Capital city, empty when unknown.
    pub capital: String,
    /// Population.
    pub population: u64,
    /// International dialing code, e.g. `+44`.
    pub dial_code: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Area in square kilometres.
    pub area: f64,
    /// URL of a PNG flag image, empty when unknown.
    pub flag_url: String,
}

impl Record {
    /// Creates a record with only its identity and name set.
    ///
    /// `code` is stored as given; callers decoding untrusted input should go
    /// through [`normalize_code`] first.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

fn normalize_alpha(raw: &str, lengths: &[usize]) -> Option<String> {
    let trimmed = raw.trim();
    if !lengths.contains(&trimmed.len()) || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Normalizes a 3-letter record code: trimmed, ASCII letters only, uppercase.
///
/// ```
/// assert_eq!(terra_codec::normalize_code(" deu "), Some("DEU".to_string()));
/// assert_eq!(terra_codec::normalize_code("de"), None);
/// ```
pub fn normalize_code(raw: &str) -> Option<String> {
    normalize_alpha(raw, &[3])
}

/// Normalizes a 2-letter short code.
pub fn normalize_short_code(raw: &str) -> Option<String> {
    normalize_alpha(raw, &[2])
}

/// Normalizes a lookup key that may be either a 3-letter code or a 2-letter
/// short code.
pub fn normalize_lookup_code(raw: &str) -> Option<String> {
    normalize_alpha(raw, &[2, 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_normalization() {
        assert_eq!(normalize_code("fra"), Some("FRA".into()));
        assert_eq!(normalize_code("  Fra\n"), Some("FRA".into()));
        assert_eq!(normalize_code("FR"), None);
        assert_eq!(normalize_code("FRAN"), None);
        assert_eq!(normalize_code("F1A"), None);
        assert_eq!(normalize_code(""), None);
        // multi-byte letters are rejected even when three chars long
        assert_eq!(normalize_code("ÅLA"), None);
    }

    #[test]
    fn lookup_code_accepts_both_lengths() {
        assert_eq!(normalize_lookup_code("de"), Some("DE".into()));
        assert_eq!(normalize_lookup_code("deu"), Some("DEU".into()));
        assert_eq!(normalize_lookup_code("d"), None);
        assert_eq!(normalize_short_code("deu"), None);
    }

    #[test]
    fn record_defaults_are_never_null() {
        let record: Record = serde_json::from_str(r#"{"code":"NOR"}"#).unwrap();
        assert_eq!(record.code, "NOR");
        assert_eq!(record.capital, "");
        assert!(record.languages.is_empty());
        assert_eq!(record.population, 0);
        assert_eq!(record.latitude, 0.0);
    }
}
