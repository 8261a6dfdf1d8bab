//! # Terra Codec
//!
//! Record codec for the Terra catalog cache.
//!
//! This crate converts between the three shapes a catalog record takes:
//! - the **wire** shape returned by the remote source ([`WireRecord`]), nested
//!   and partially optional
//! - the canonical **domain** shape ([`Record`]), where nothing is ever null
//! - the **column** encodings used by stored rows: nested lists are kept as
//!   JSON array text ([`encode_list`] / [`decode_list`]) and whole snapshots
//!   as CBOR ([`to_cbor`] / [`from_cbor`])
//!
//! ## Decoding Rules
//!
//! - Wire decoding is per-record tolerant: a malformed record is dropped and
//!   logged, the rest of the batch survives
//! - A non-empty payload from which no record decodes is a
//!   [`CodecError::NoValidRecords`] failure
//! - List-column decoding never fails: blank or invalid text decodes to an
//!   empty list
//!
//! ## Usage
//!
//! ```
//! use terra_codec::{build_dial_code, decode_list, encode_list, Language};
//!
//! assert_eq!(build_dial_code("+3", &["906698".into(), "79".into()]), "+379");
//!
//! let langs = vec![Language::new("deu", "German")];
//! let column = encode_list(&langs).unwrap();
//! let back: Vec<Language> = decode_list(&column);
//! assert_eq!(back, langs);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod column;
mod dial;
mod error;
mod model;
mod wire;

pub use cbor::{from_cbor, to_cbor};
pub use column::{decode_list, encode_list};
pub use dial::build_dial_code;
pub use error::{CodecError, CodecResult};
pub use model::{
    normalize_code, normalize_lookup_code, normalize_short_code, Currency, Language, Record,
};
pub use wire::{
    decode_records, decode_wire_payload, WireCurrency, WireDialing, WireFlags, WireName,
    WireRecord,
};
