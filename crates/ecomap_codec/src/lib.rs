//! # ecomap Codec
//!
//! CBOR encoding/decoding of object-map update payloads.
//!
//! Journal entries carry each update as an opaque `(UpdateKind, Bytes)` pair.
//! This crate defines the three payload shapes and their wire form:
//!
//! | kind | decoded shape | CBOR |
//! |---|---|---|
//! | `Insert` | `BTreeMap<String, Bytes>` | map of text to byte string |
//! | `Remove` | `BTreeSet<String>` | array of text |
//! | `RemoveRange` | `(String, Option<String>)` | 2-array `[text, text \| null]` |
//!
//! Map and set payloads are ordered, so identical updates always produce
//! identical bytes.
//!
//! ## Usage
//!
//! ```
//! use ecomap_codec::{decode_update, encode_update, OmapUpdate, UpdateKind};
//!
//! let update = OmapUpdate::remove_range("key_010", Some("key_020"));
//! let (kind, payload) = encode_update(&update).unwrap();
//! assert_eq!(kind, UpdateKind::RemoveRange);
//!
//! let decoded = decode_update(kind, &payload).unwrap();
//! assert_eq!(decoded, update);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod payload;
mod update;

pub use error::{CodecError, CodecResult};
pub use payload::{decode_update, encode_insert, encode_remove, encode_remove_range, encode_update};
pub use update::{OmapUpdate, UpdateKind};
