//! Stored row: the persisted shape of a record.

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use terra_codec::{
    decode_list, encode_list, normalize_code, normalize_short_code, CodecError, Record,
};

/// Bytes charged per numeric column when estimating row size.
const NUMERIC_COLUMN_BYTES: u64 = 8;
/// Number of numeric columns (population, latitude, longitude, area, last_updated).
const NUMERIC_COLUMNS: u64 = 5;

/// A record as held by the local store.
///
/// Identical to [`Record`] except that the nested language and currency
/// lists live in single JSON text columns, and the row carries the time it
/// was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    /// Unique 3-letter code.
    pub code: String,
    /// 2-letter code.
    pub short_code: String,
    /// Name.
    pub name: String,
    /// Category (region).
    pub category: String,
    /// Subcategory (subregion).
    pub subcategory: String,
    /// Languages as JSON array text.
    pub languages: String,
    /// Currencies as JSON array text.
    pub currencies: String,
    /// Capital.
    pub capital: String,
    /// Population.
    pub population: u64,
    /// Dialing code.
    pub dial_code: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Area in km².
    pub area: f64,
    /// Flag image URL.
    pub flag_url: String,
    /// Write-back time, epoch millis.
    pub last_updated: u64,
}

impl StoredRow {
    /// Builds a row from a record, stamped with `last_updated`.
    ///
    /// Codes are stored uppercase; a malformed short code is stored empty.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCode`] if the code is not three letters,
    /// or a codec error if a list column cannot be encoded.
    pub fn from_record(record: &Record, last_updated: u64) -> CoreResult<Self> {
        let code =
            normalize_code(&record.code).ok_or_else(|| CodecError::invalid_code(&record.code))?;
        Ok(Self {
            code,
            short_code: normalize_short_code(&record.short_code).unwrap_or_default(),
            name: record.name.clone(),
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            languages: encode_list(&record.languages)?,
            currencies: encode_list(&record.currencies)?,
            capital: record.capital.clone(),
            population: record.population,
            dial_code: record.dial_code.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            area: record.area,
            flag_url: record.flag_url.clone(),
            last_updated,
        })
    }

    /// Converts the row back into a record.
    ///
    /// List columns that fail to decode come back as empty lists.
    pub fn to_record(&self) -> Record {
        Record {
            code: self.code.clone(),
            short_code: self.short_code.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            languages: decode_list(&self.languages),
            currencies: decode_list(&self.currencies),
            capital: self.capital.clone(),
            population: self.population,
            dial_code: self.dial_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            area: self.area,
            flag_url: self.flag_url.clone(),
        }
    }

    /// Approximate in-store size of the row in bytes.
    pub fn estimated_size(&self) -> u64 {
        let text = [
            &self.code,
            &self.short_code,
            &self.name,
            &self.category,
            &self.subcategory,
            &self.languages,
            &self.currencies,
            &self.capital,
            &self.dial_code,
            &self.flag_url,
        ]
        .iter()
        .map(|s| s.len() as u64)
        .sum::<u64>();

        text + NUMERIC_COLUMN_BYTES * NUMERIC_COLUMNS
    }
}
