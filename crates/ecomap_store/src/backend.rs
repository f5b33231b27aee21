//! Object-map store trait definition.

use crate::error::StoreResult;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// The backing key-value store for a single object's omap.
///
/// Stores are **opaque** ordered maps. They provide the primitives a consumer
/// needs to apply folded journal results (bulk range deletes, key sets, key
/// removals, header replacement) and to page through the current contents.
///
/// # Invariants
///
/// - Keys are ordered bytewise; the empty string is the minimum key
/// - `scan` returns keys strictly greater than `start_after`, ascending
/// - `rm_range(start, end)` removes every key in `[start, end)`; `end = None`
///   removes through the end of the keyspace
/// - Stores must be `Send + Sync` for concurrent readers
///
/// # Implementors
///
/// - [`super::InMemoryOmapStore`] - For testing
pub trait OmapStore: Send + Sync {
    /// Returns the stored header, if one was ever set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_header(&self) -> StoreResult<Option<Bytes>>;

    /// Replaces the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_header(&mut self, header: Bytes) -> StoreResult<()>;

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Returns up to `max` entries with keys strictly after `start_after`.
    ///
    /// Pass an empty `start_after` to scan from the beginning (the empty key
    /// itself is never returned by a scan from `""`).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn scan(&self, start_after: &str, max: usize) -> StoreResult<Vec<(String, Bytes)>>;

    /// Returns up to `max` entries with keys at or after `start`.
    ///
    /// Lets readers seek straight to a key prefix. The default looks `start`
    /// up and then scans after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn scan_from(&self, start: &str, max: usize) -> StoreResult<Vec<(String, Bytes)>> {
        if max == 0 {
            return Ok(Vec::new());
        }
        let mut entries = Vec::with_capacity(max);
        if let Some(value) = self.get(start)? {
            entries.push((start.to_string(), value));
        }
        entries.extend(self.scan(start, max - entries.len())?);
        Ok(entries)
    }

    /// Inserts or overwrites every key in `values`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_keys(&mut self, values: &BTreeMap<String, Bytes>) -> StoreResult<()>;

    /// Removes every key in `keys`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn rm_keys(&mut self, keys: &BTreeSet<String>) -> StoreResult<()>;

    /// Removes every key in `[start, end)`.
    ///
    /// An inverted or empty interval removes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn rm_range(&mut self, start: &str, end: Option<&str>) -> StoreResult<()>;

    /// Removes all keys and the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn clear(&mut self) -> StoreResult<()>;

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn len(&self) -> StoreResult<usize>;

    /// Returns true if no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
