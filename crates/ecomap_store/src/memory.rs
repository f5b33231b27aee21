//! In-memory omap store for testing.

use crate::backend::OmapStore;
use crate::error::{StoreError, StoreResult};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

#[derive(Debug, Default)]
struct Inner {
    values: BTreeMap<String, Bytes>,
    header: Option<Bytes>,
    closed: bool,
}

/// An in-memory omap store.
///
/// This store keeps one object's omap in a `BTreeMap` and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral objects that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use ecomap_store::{InMemoryOmapStore, OmapStore};
///
/// let mut store = InMemoryOmapStore::new();
/// store.rm_range("a", Some("b")).unwrap();
/// assert_eq!(store.len().unwrap(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryOmapStore {
    inner: RwLock<Inner>,
}

impl InMemoryOmapStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing contents.
    ///
    /// Useful for testing reads against data that was applied earlier.
    #[must_use]
    pub fn with_values(values: BTreeMap<String, Bytes>, header: Option<Bytes>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                values,
                header,
                closed: false,
            }),
        }
    }

    /// Returns a copy of all stored key/value pairs.
    #[must_use]
    pub fn values(&self) -> BTreeMap<String, Bytes> {
        self.inner.read().values.clone()
    }

    /// Marks the store closed; every later operation fails with
    /// [`StoreError::Closed`].
    pub fn close(&self) {
        self.inner.write().closed = true;
    }

    fn ensure_open(inner: &Inner) -> StoreResult<()> {
        if inner.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl OmapStore for InMemoryOmapStore {
    fn get_header(&self) -> StoreResult<Option<Bytes>> {
        let inner = self.inner.read();
        Self::ensure_open(&inner)?;
        Ok(inner.header.clone())
    }

    fn set_header(&mut self, header: Bytes) -> StoreResult<()> {
        let mut inner = self.inner.write();
        Self::ensure_open(&inner)?;
        inner.header = Some(header);
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let inner = self.inner.read();
        Self::ensure_open(&inner)?;
        Ok(inner.values.get(key).cloned())
    }

    fn scan(&self, start_after: &str, max: usize) -> StoreResult<Vec<(String, Bytes)>> {
        let inner = self.inner.read();
        Self::ensure_open(&inner)?;
        Ok(inner
            .values
            .range::<str, _>((Bound::Excluded(start_after), Bound::Unbounded))
            .take(max)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn scan_from(&self, start: &str, max: usize) -> StoreResult<Vec<(String, Bytes)>> {
        let inner = self.inner.read();
        Self::ensure_open(&inner)?;
        Ok(inner
            .values
            .range::<str, _>((Bound::Included(start), Bound::Unbounded))
            .take(max)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn set_keys(&mut self, values: &BTreeMap<String, Bytes>) -> StoreResult<()> {
        let mut inner = self.inner.write();
        Self::ensure_open(&inner)?;
        for (key, value) in values {
            inner.values.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn rm_keys(&mut self, keys: &BTreeSet<String>) -> StoreResult<()> {
        let mut inner = self.inner.write();
        Self::ensure_open(&inner)?;
        for key in keys {
            inner.values.remove(key);
        }
        Ok(())
    }

    fn rm_range(&mut self, start: &str, end: Option<&str>) -> StoreResult<()> {
        let mut inner = self.inner.write();
        Self::ensure_open(&inner)?;
        if matches!(end, Some(end) if end <= start) {
            return Ok(());
        }

        let mut tail = inner.values.split_off(start);
        if let Some(end) = end {
            let mut kept = tail.split_off(end);
            inner.values.append(&mut kept);
        }
        tail.clear();
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        let mut inner = self.inner.write();
        Self::ensure_open(&inner)?;
        inner.values.clear();
        inner.header = None;
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        let inner = self.inner.read();
        Self::ensure_open(&inner)?;
        Ok(inner.values.len())
    }
}
