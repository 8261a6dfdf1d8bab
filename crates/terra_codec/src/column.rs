//! List columns: nested lists stored as a single JSON array text column.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Encodes a list as JSON array text.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if an element cannot be serialized.
pub fn encode_list<T: Serialize>(items: &[T]) -> CodecResult<String> {
    serde_json::to_string(items).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Decodes JSON array text back into a list.
///
/// Never fails: empty or whitespace-only text decodes to an empty list, and
/// so does syntactically invalid text (the anomaly is logged).
pub fn decode_list<T: DeserializeOwned>(text: &str) -> Vec<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<T>>(trimmed) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, column_len = trimmed.len(), "undecodable list column, using empty list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Currency, Language};
    use proptest::prelude::*;

    #[test]
    fn empty_list_roundtrip() {
        let text = encode_list::<Language>(&[]).unwrap();
        assert_eq!(text, "[]");
        assert!(decode_list::<Language>(&text).is_empty());
    }

    #[test]
    fn blank_text_decodes_empty() {
        assert!(decode_list::<Language>("").is_empty());
        assert!(decode_list::<Language>("   \n\t").is_empty());
    }

    #[test]
    fn invalid_text_decodes_empty() {
        assert!(decode_list::<Currency>("[{\"code\":").is_empty());
        assert!(decode_list::<Currency>("not json").is_empty());
        assert!(decode_list::<Currency>("{\"code\":\"EUR\"}").is_empty());
    }

    #[test]
    fn null_sub_fields_survive() {
        let items = vec![
            Currency {
                code: Some("EUR".into()),
                name: None,
                symbol: Some("€".into()),
            },
            Currency::default(),
        ];
        let text = encode_list(&items).unwrap();
        assert!(text.contains("null"));
        assert_eq!(decode_list::<Currency>(&text), items);
    }

    #[test]
    fn non_ascii_survives() {
        let items = vec![
            Language::new("jpn", "日本語"),
            Language::new("ara", "العربية"),
        ];
        let text = encode_list(&items).unwrap();
        assert_eq!(decode_list::<Language>(&text), items);
    }

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of(any::<String>())
    }

    proptest! {
        #[test]
        fn language_lists_roundtrip(
            items in prop::collection::vec(
                (opt_text(), opt_text()).prop_map(|(code, name)| Language { code, name }),
                0..8,
            )
        ) {
            let text = encode_list(&items).unwrap();
            prop_assert_eq!(decode_list::<Language>(&text), items);
        }

        #[test]
        fn currency_lists_roundtrip(
            items in prop::collection::vec(
                (opt_text(), opt_text(), opt_text())
                    .prop_map(|(code, name, symbol)| Currency { code, name, symbol }),
                0..8,
            )
        ) {
            let text = encode_list(&items).unwrap();
            prop_assert_eq!(decode_list::<Currency>(&text), items);
        }
    }
}
