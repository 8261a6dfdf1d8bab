//! Catalog fixtures.
//!
//! A small payload in the remote source's wire shape, covering the cases
//! the codec cares about: multi-suffix dialing codes, area-code suffixes,
//! missing fields and one record without a usable code.

use tempfile::TempDir;
use terra_codec::{decode_records, decode_wire_payload, Record, WireName, WireRecord};

/// A remote catalog payload. Eight elements, seven usable records.
pub const SAMPLE_PAYLOAD: &str = r#"[
  {
    "name": {"common": "Canada", "official": "Canada"},
    "cca2": "CA", "cca3": "CAN",
    "capital": ["Ottawa"],
    "region": "Americas", "subregion": "North America",
    "languages": {"eng": "English", "fra": "French"},
    "currencies": {"CAD": {"name": "Canadian dollar", "symbol": "$"}},
    "population": 38005238,
    "idd": {"root": "+1", "suffixes": [""]},
    "latlng": [60.0, -95.0],
    "area": 9984670.0,
    "flags": {"png": "https://flagcdn.com/w320/ca.png", "svg": "https://flagcdn.com/ca.svg"}
  },
  {
    "name": {"common": "Australia", "official": "Commonwealth of Australia"},
    "cca2": "AU", "cca3": "AUS",
    "capital": ["Canberra"],
    "region": "Oceania", "subregion": "Australia and New Zealand",
    "languages": {"eng": "English"},
    "currencies": {"AUD": {"name": "Australian dollar", "symbol": "$"}},
    "population": 25687041,
    "idd": {"root": "+6", "suffixes": ["1"]},
    "latlng": [-27.0, 133.0],
    "area": 7692024.0
  },
  {
    "name": {"common": "Vatican City", "official": "Vatican City State"},
    "cca2": "VA", "cca3": "VAT",
    "capital": ["Vatican City"],
    "region": "Europe", "subregion": "Southern Europe",
    "languages": {"ita": "Italian", "lat": "Latin"},
    "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
    "population": 451,
    "idd": {"root": "+3", "suffixes": ["906698", "79"]},
    "latlng": [41.9, 12.45],
    "area": 0.44
  },
  {
    "name": {"common": "United States", "official": "United States of America"},
    "cca2": "US", "cca3": "USA",
    "capital": ["Washington, D.C."],
    "region": "Americas", "subregion": "North America",
    "languages": {"eng": "English"},
    "currencies": {"USD": {"name": "United States dollar", "symbol": "$"}},
    "population": 329484123,
    "idd": {"root": "+1", "suffixes": ["201", "202", "203"]},
    "latlng": [38.0, -97.0],
    "area": 9372610.0
  },
  {
    "name": {"common": "Peru", "official": "Republic of Peru"},
    "cca2": "PE", "cca3": "PER",
    "capital": ["Lima"],
    "region": "Americas", "subregion": "South America",
    "languages": {"aym": "Aymara", "que": "Quechua", "spa": "Spanish"},
    "currencies": {"PEN": {"name": "Peruvian sol", "symbol": "S/ "}},
    "population": 32971846,
    "idd": {"root": "+5", "suffixes": ["1"]},
    "latlng": [-10.0, -76.0],
    "area": 1285216.0
  },
  {
    "name": {"common": "Côte d'Ivoire", "official": "Republic of Côte d'Ivoire"},
    "cca2": "CI", "cca3": "CIV",
    "capital": ["Yamoussoukro"],
    "region": "Africa", "subregion": "Western Africa",
    "languages": {"fra": "French"},
    "currencies": {"XOF": {"name": "West African CFA franc", "symbol": "Fr"}},
    "population": 26378275,
    "idd": {"root": "+2", "suffixes": ["25"]},
    "latlng": [8.0, -5.0],
    "area": 322463.0
  },
  {
    "name": {"common": "Antarctica"},
    "cca2": "AQ", "cca3": "ATA",
    "region": "Antarctic",
    "population": 1000,
    "idd": {},
    "latlng": [-90.0, 0.0],
    "area": 14000000.0
  },
  {
    "name": {"common": "Nowhere"},
    "region": "Europe"
  }
]"#;

/// Number of usable records in [`SAMPLE_PAYLOAD`].
pub const SAMPLE_RECORD_COUNT: usize = 7;

/// [`SAMPLE_PAYLOAD`] decoded into wire records.
pub fn sample_wire_records() -> Vec<WireRecord> {
    decode_wire_payload(SAMPLE_PAYLOAD.as_bytes()).expect("sample payload is a JSON array")
}

/// [`SAMPLE_PAYLOAD`] decoded into domain records.
pub fn sample_records() -> Vec<Record> {
    decode_records(&sample_wire_records()).expect("sample payload has valid records")
}

/// A minimal wire record.
pub fn wire_record(code: &str, name: &str, capital: &str, region: &str) -> WireRecord {
    WireRecord {
        name: Some(WireName {
            common: Some(name.to_string()),
            official: None,
        }),
        cca3: Some(code.to_string()),
        capital: (!capital.is_empty()).then(|| vec![capital.to_string()]),
        region: Some(region.to_string()),
        ..WireRecord::default()
    }
}

/// A minimal domain record.
pub fn record(code: &str, name: &str, capital: &str, region: &str) -> Record {
    let mut record = Record::new(code, name);
    record.capital = capital.to_string();
    record.category = region.to_string();
    record
}

/// A temporary data directory, removed on drop.
pub fn temp_data_dir() -> TempDir {
    TempDir::new().expect("failed to create temp directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_payload_decodes() {
        let records = sample_records();
        assert_eq!(records.len(), SAMPLE_RECORD_COUNT);
        assert_eq!(sample_wire_records().len(), 8);
    }

    #[test]
    fn sample_dial_codes() {
        let records = sample_records();
        let dial = |code: &str| {
            records
                .iter()
                .find(|r| r.code == code)
                .map(|r| r.dial_code.clone())
                .unwrap()
        };
        assert_eq!(dial("VAT"), "+379");
        assert_eq!(dial("USA"), "+1");
        assert_eq!(dial("CAN"), "+1");
        assert_eq!(dial("PER"), "+51");
        assert_eq!(dial("ATA"), "");
    }
}
