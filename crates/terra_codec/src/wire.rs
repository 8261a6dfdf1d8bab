//! Wire format of the remote catalog and its conversion into [`Record`]s.

use crate::dial::build_dial_code;
use crate::error::{CodecError, CodecResult};
use crate::model::{normalize_code, normalize_short_code, Currency, Language, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Name block of a wire record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireName {
    /// Common name, e.g. "Germany".
    pub common: Option<String>,
    /// Official name, e.g. "Federal Republic of Germany".
    pub official: Option<String>,
}

/// Currency block of a wire record (keyed by currency code in the parent map).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCurrency {
    /// Display name.
    pub name: Option<String>,
    /// Symbol.
    pub symbol: Option<String>,
}

/// Structured international dialing code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireDialing {
    /// Root, e.g. `+3`.
    pub root: Option<String>,
    /// Suffixes appended to the root.
    pub suffixes: Option<Vec<String>>,
}

/// Flag image URLs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireFlags {
    /// PNG image URL.
    pub png: Option<String>,
    /// SVG image URL.
    pub svg: Option<String>,
}

/// One record as delivered by the remote source.
///
/// Every field is optional so that a missing or `null` field never rejects a
/// record on its own; only a field of the wrong type does.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireRecord {
    /// Name block.
    pub name: Option<WireName>,
    /// 2-letter code.
    pub cca2: Option<String>,
    /// 3-letter code (the record identity).
    pub cca3: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Subregion.
    pub subregion: Option<String>,
    /// Languages keyed by language code.
    pub languages: Option<BTreeMap<String, String>>,
    /// Currencies keyed by currency code.
    pub currencies: Option<BTreeMap<String, WireCurrency>>,
    /// Capital cities; only the first one is kept.
    pub capital: Option<Vec<String>>,
    /// Population.
    pub population: Option<f64>,
    /// Dialing code.
    pub idd: Option<WireDialing>,
    /// `[latitude, longitude]`.
    pub latlng: Option<Vec<f64>>,
    /// Area in km².
    pub area: Option<f64>,
    /// Flag images.
    pub flags: Option<WireFlags>,
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

impl WireRecord {
    /// Converts the wire record into a canonical [`Record`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCode`] when `cca3` is absent or not three
    /// ASCII letters. Every other field falls back to its default.
    pub fn to_record(&self) -> CodecResult<Record> {
        let raw_code = self.cca3.as_deref().unwrap_or_default();
        let code = normalize_code(raw_code).ok_or_else(|| CodecError::invalid_code(raw_code))?;

        let name = self
            .name
            .as_ref()
            .and_then(|n| n.common.as_deref().or(n.official.as_deref()))
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let languages = self
            .languages
            .iter()
            .flatten()
            .map(|(code, name)| Language::new(code.as_str(), name.as_str()))
            .collect();

        let currencies = self
            .currencies
            .iter()
            .flatten()
            .map(|(code, currency)| Currency {
                code: Some(code.clone()),
                name: currency.name.clone(),
                symbol: currency.symbol.clone(),
            })
            .collect();

        let capital = self
            .capital
            .as_ref()
            .and_then(|c| c.first())
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        let population = match self.population {
            Some(p) if p.is_finite() && p > 0.0 => p.round() as u64,
            _ => 0,
        };

        // A suffix without a root is not dialable.
        let dial_code = self
            .idd
            .as_ref()
            .and_then(|idd| {
                let root = idd.root.as_deref().filter(|root| !root.trim().is_empty())?;
                Some(build_dial_code(
                    root,
                    idd.suffixes.as_deref().unwrap_or_default(),
                ))
            })
            .unwrap_or_default();

        let (latitude, longitude) = match self.latlng.as_deref() {
            Some([lat, lng, ..]) => (finite_or_zero(Some(*lat)), finite_or_zero(Some(*lng))),
            _ => (0.0, 0.0),
        };

        Ok(Record {
            code,
            short_code: self
                .cca2
                .as_deref()
                .and_then(normalize_short_code)
                .unwrap_or_default(),
            name,
            category: text(&self.region),
            subcategory: text(&self.subregion),
            languages,
            currencies,
            capital,
            population,
            dial_code,
            latitude,
            longitude,
            area: finite_or_zero(self.area).max(0.0),
            flag_url: self
                .flags
                .as_ref()
                .map(|f| text(&f.png))
                .unwrap_or_default(),
        })
    }
}

/// Decodes a full remote payload (a JSON array of records).
///
/// Elements that do not match the wire shape are dropped and logged.
///
/// # Errors
///
/// - [`CodecError::DecodingFailed`] if the payload is not a JSON array
/// - [`CodecError::NoValidRecords`] if the array is non-empty but no element
///   decodes
pub fn decode_wire_payload(bytes: &[u8]) -> CodecResult<Vec<WireRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes).map_err(|e| {
        CodecError::decoding_failed(format!("catalog payload is not a JSON array: {e}"))
    })?;

    let total = values.len();
    let mut records = Vec::with_capacity(total);
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<WireRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "dropping malformed wire record"),
        }
    }

    if total > 0 && records.is_empty() {
        return Err(CodecError::NoValidRecords { total });
    }
    debug!(total, decoded = records.len(), "decoded wire payload");
    Ok(records)
}

/// Converts a batch of wire records into domain records.
///
/// Records with an invalid code are dropped, as are later duplicates of a
/// code already seen. Input order is preserved.
///
/// # Errors
///
/// Returns [`CodecError::NoValidRecords`] if `wire` is non-empty and nothing
/// survives.
pub fn decode_records(wire: &[WireRecord]) -> CodecResult<Vec<Record>> {
    let mut seen = HashSet::with_capacity(wire.len());
    let mut records = Vec::with_capacity(wire.len());

    for (index, item) in wire.iter().enumerate() {
        match item.to_record() {
            Ok(record) => {
                if seen.insert(record.code.clone()) {
                    records.push(record);
                } else {
                    warn!(index, code = %record.code, "dropping duplicate record code");
                }
            }
            Err(e) => warn!(index, error = %e, "dropping undecodable record"),
        }
    }

    if !wire.is_empty() && records.is_empty() {
        return Err(CodecError::NoValidRecords { total: wire.len() });
    }
    Ok(records)
}
