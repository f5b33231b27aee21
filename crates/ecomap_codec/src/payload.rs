//! Payload encoding and decoding.

use crate::error::{CodecError, CodecResult};
use crate::update::{OmapUpdate, UpdateKind};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Encode an update into its kind tag and CBOR payload.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_update(update: &OmapUpdate) -> CodecResult<(UpdateKind, Bytes)> {
    let payload = match update {
        OmapUpdate::Insert(values) => encode_insert(values)?,
        OmapUpdate::Remove(keys) => encode_remove(keys)?,
        OmapUpdate::RemoveRange { start, end } => encode_remove_range(start, end.as_deref())?,
    };
    Ok((update.kind(), payload))
}

/// Encode an `Insert` payload.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_insert(values: &BTreeMap<String, Bytes>) -> CodecResult<Bytes> {
    to_cbor(values)
}

/// Encode a `Remove` payload.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_remove(keys: &BTreeSet<String>) -> CodecResult<Bytes> {
    to_cbor(keys)
}

/// Encode a `RemoveRange` payload.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_remove_range(start: &str, end: Option<&str>) -> CodecResult<Bytes> {
    to_cbor(&(start, end))
}

/// Decode a payload according to its kind tag.
///
/// The payload must contain exactly one CBOR item of the shape the kind
/// requires; trailing bytes are rejected.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the bytes are not a valid
/// payload of `kind`.
pub fn decode_update(kind: UpdateKind, payload: &[u8]) -> CodecResult<OmapUpdate> {
    match kind {
        UpdateKind::Insert => from_cbor(kind, payload).map(OmapUpdate::Insert),
        UpdateKind::Remove => from_cbor(kind, payload).map(OmapUpdate::Remove),
        UpdateKind::RemoveRange => {
            let (start, end): (String, Option<String>) = from_cbor(kind, payload)?;
            Ok(OmapUpdate::RemoveRange { start, end })
        }
    }
}

fn to_cbor<T: Serialize + ?Sized>(value: &T) -> CodecResult<Bytes> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(Bytes::from(buffer))
}

fn from_cbor<T: DeserializeOwned>(kind: UpdateKind, payload: &[u8]) -> CodecResult<T> {
    let mut reader = payload;
    let value = ciborium::from_reader(&mut reader)
        .map_err(|e| CodecError::decoding_failed(kind, e.to_string()))?;
    if !reader.is_empty() {
        return Err(CodecError::decoding_failed(
            kind,
            format!("{} trailing bytes", reader.len()),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_payload_is_cbor_map() {
        let update = OmapUpdate::insert([("a", &b"\x01"[..])]);
        let (kind, payload) = encode_update(&update).unwrap();

        assert_eq!(kind, UpdateKind::Insert);
        // map(1), text(1) "a", bytes(1) 0x01
        assert_eq!(&payload[..], &[0xa1, 0x61, b'a', 0x41, 0x01]);
    }

    #[test]
    fn remove_range_unbounded_end_is_null() {
        let payload = encode_remove_range("k", None).unwrap();
        // array(2), text(1) "k", null
        assert_eq!(&payload[..], &[0x82, 0x61, b'k', 0xf6]);

        let decoded = decode_update(UpdateKind::RemoveRange, &payload).unwrap();
        assert_eq!(decoded, OmapUpdate::remove_range("k", None::<String>));
    }

    #[test]
    fn decode_with_wrong_kind_fails() {
        let (_, payload) = encode_update(&OmapUpdate::insert([("a", "1")])).unwrap();
        let err = decode_update(UpdateKind::Remove, &payload).unwrap_err();
        assert!(matches!(
            err,
            CodecError::DecodingFailed {
                kind: UpdateKind::Remove,
                ..
            }
        ));
    }

    #[test]
    fn decode_truncated_payload_fails() {
        let (_, payload) = encode_update(&OmapUpdate::remove(["alpha", "beta"])).unwrap();
        let truncated = &payload[..payload.len() - 2];
        assert!(decode_update(UpdateKind::Remove, truncated).is_err());
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut payload = encode_remove(&BTreeSet::new()).unwrap().to_vec();
        payload.push(0x00);
        assert!(decode_update(UpdateKind::Remove, &payload).is_err());
    }

    #[test]
    fn decode_empty_payload_fails() {
        assert!(decode_update(UpdateKind::Insert, &[]).is_err());
    }

    proptest! {
        #[test]
        fn encoding_is_deterministic(
            keys in prop::collection::btree_map(
                "[a-z_0-9]{0,12}",
                prop::collection::vec(any::<u8>(), 0..16),
                0..16,
            ),
        ) {
            let values: BTreeMap<String, Bytes> =
                keys.into_iter().map(|(k, v)| (k, Bytes::from(v))).collect();
            let first = encode_insert(&values).unwrap();
            let second = encode_insert(&values.clone()).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                decode_update(UpdateKind::Insert, &first).unwrap(),
                OmapUpdate::Insert(values)
            );
        }
    }
}
