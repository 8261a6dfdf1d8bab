//! CBOR encoding for persisted snapshots.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a value to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn to_cbor<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buf)
}

/// Deserializes a value from CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the bytes are not valid CBOR for `T`.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Currency, Language, Record};

    #[test]
    fn record_roundtrip() {
        let mut record = Record::new("CHE", "Switzerland");
        record.languages = vec![Language::new("fra", "French"), Language::default()];
        record.currencies = vec![Currency::new("CHF", "Swiss franc", "Fr.")];
        record.latitude = 47.0;
        record.longitude = 8.0;

        let bytes = to_cbor(&record).unwrap();
        let decoded: Record = from_cbor(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let result: CodecResult<Record> = from_cbor(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn truncated_input_fails() {
        let bytes = to_cbor(&Record::new("CHE", "Switzerland")).unwrap();
        let result: CodecResult<Record> = from_cbor(&bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }
}
