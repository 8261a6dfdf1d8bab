//! Property-based test generators using proptest.
//!
//! Generated records always satisfy the domain invariants: codes are three
//! uppercase ASCII letters, short codes two, and a generated catalog never
//! repeats a code.

use proptest::prelude::*;
use terra_codec::{Currency, Language, Record};

/// Text that mixes ASCII with accented and non-Latin characters.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z ,.'éüçøÅ漢字ĀΩ€$-]{0,16}").expect("Invalid regex")
}

/// Optional text.
pub fn optional_text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(text_strategy())
}

/// Language entries with possibly missing sub-fields.
pub fn language_strategy() -> impl Strategy<Value = Language> {
    (optional_text_strategy(), optional_text_strategy())
        .prop_map(|(code, name)| Language { code, name })
}

/// Currency entries with possibly missing sub-fields.
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    (
        optional_text_strategy(),
        optional_text_strategy(),
        optional_text_strategy(),
    )
        .prop_map(|(code, name, symbol)| Currency { code, name, symbol })
}

/// A valid 3-letter record code.
pub fn code_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{3}").expect("Invalid regex")
}

/// Region names, drawn from a small set so filters have something to hit.
pub fn region_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Africa", "Americas", "Asia", "Europe", "Oceania", ""])
        .prop_map(str::to_string)
}

/// A complete record with the given code.
pub fn record_with_code(code: String) -> impl Strategy<Value = Record> {
    (
        text_strategy(),
        region_strategy(),
        prop::collection::vec(language_strategy(), 0..4),
        prop::collection::vec(currency_strategy(), 0..3),
        text_strategy(),
        0u64..2_000_000_000,
        -90.0f64..90.0,
        -180.0f64..180.0,
        0.0f64..20_000_000.0,
    )
        .prop_map(
            move |(name, region, languages, currencies, capital, population, lat, lng, area)| {
                Record {
                    short_code: code[..2].to_string(),
                    code: code.clone(),
                    name,
                    category: region,
                    subcategory: String::new(),
                    languages,
                    currencies,
                    capital,
                    population,
                    dial_code: String::new(),
                    latitude: lat,
                    longitude: lng,
                    area,
                    flag_url: String::new(),
                }
            },
        )
}

/// A record with a random code.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    code_strategy().prop_flat_map(record_with_code)
}

/// A catalog of up to `max_len` records with distinct codes.
pub fn catalog_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::btree_set(code_strategy(), 0..=max_len).prop_flat_map(|codes| {
        codes
            .into_iter()
            .map(record_with_code)
            .collect::<Vec<_>>()
    })
}

/// Search queries, including blank ones.
pub fn query_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ a-zA-Zé]{0,4}").expect("Invalid regex")
}
