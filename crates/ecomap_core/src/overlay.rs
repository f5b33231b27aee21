//! Applying folded journal state to a backing store, and reading through it.
//!
//! Folded state is applied in two phases: every removed range is deleted
//! from the store first, then the key cache is applied (values set,
//! tombstones removed). [`OmapOverlay`] answers reads as if that had
//! already happened.

use crate::error::CoreResult;
use crate::journal::{CachedValue, RemovedRanges};
use bytes::Bytes;
use ecomap_store::OmapStore;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::Bound;

/// Keys fetched from the store per scan call.
const SCAN_BATCH: usize = 128;

/// Comparison applied by [`OmapOverlay::cmp`]: `stored <op> asserted`,
/// bytewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Stored value equals the asserted value.
    Eq,
    /// Stored value differs from the asserted value.
    Ne,
    /// Stored value sorts after the asserted value.
    Gt,
    /// Stored value sorts after or equals the asserted value.
    Gte,
    /// Stored value sorts before the asserted value.
    Lt,
    /// Stored value sorts before or equals the asserted value.
    Lte,
}

impl CmpOp {
    /// Returns true if `stored <op> asserted` holds.
    #[must_use]
    pub fn holds(self, stored: &[u8], asserted: &[u8]) -> bool {
        match self {
            Self::Eq => stored == asserted,
            Self::Ne => stored != asserted,
            Self::Gt => stored > asserted,
            Self::Gte => stored >= asserted,
            Self::Lt => stored < asserted,
            Self::Lte => stored <= asserted,
        }
    }
}

/// Applies folded key updates and removed ranges to `store`.
///
/// # Errors
///
/// Returns an error if the store rejects any of the writes. Earlier phases
/// are not rolled back.
pub fn apply_value_updates<S>(
    store: &mut S,
    values: &BTreeMap<String, CachedValue>,
    ranges: &RemovedRanges,
) -> CoreResult<()>
where
    S: OmapStore + ?Sized,
{
    for (start, end) in ranges {
        store.rm_range(start, end.as_deref())?;
    }

    let mut sets = BTreeMap::new();
    let mut removes = BTreeSet::new();
    for (key, cached) in values {
        match &cached.value {
            Some(value) => {
                sets.insert(key.clone(), value.clone());
            }
            None => {
                removes.insert(key.clone());
            }
        }
    }

    if !sets.is_empty() {
        store.set_keys(&sets)?;
    }
    if !removes.is_empty() {
        store.rm_keys(&removes)?;
    }
    Ok(())
}

/// Writes the folded header, if one was recorded.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn apply_header<S>(store: &mut S, header: Option<Bytes>) -> CoreResult<()>
where
    S: OmapStore + ?Sized,
{
    if let Some(header) = header {
        store.set_header(header)?;
    }
    Ok(())
}

/// A read view of one object's omap with its folded journal state laid
/// over the backing store.
///
/// Store keys covered by a removed range or shadowed by a journal key are
/// hidden; journal tombstones read as absent.
#[derive(Debug)]
pub struct OmapOverlay<'a, S: ?Sized> {
    store: &'a S,
    values: BTreeMap<String, CachedValue>,
    ranges: RemovedRanges,
    header: Option<Bytes>,
}

impl<'a, S> OmapOverlay<'a, S>
where
    S: OmapStore + ?Sized,
{
    /// Creates an overlay from folded state.
    pub fn new(
        store: &'a S,
        values: BTreeMap<String, CachedValue>,
        ranges: RemovedRanges,
        header: Option<Bytes>,
    ) -> Self {
        Self {
            store,
            values,
            ranges,
            header,
        }
    }

    /// Returns the journal header if one was recorded, otherwise the store's.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub fn get_header(&self) -> CoreResult<Option<Bytes>> {
        match &self.header {
            Some(header) => Ok(Some(header.clone())),
            None => Ok(self.store.get_header()?),
        }
    }

    /// Returns up to `max` key/value pairs with keys strictly after
    /// `start_after` and starting with `filter_prefix`, in key order.
    ///
    /// The flag is true when more matching pairs follow.
    ///
    /// # Errors
    ///
    /// Returns an error if a store scan fails.
    pub fn get_vals(
        &self,
        start_after: &str,
        filter_prefix: &str,
        max: usize,
    ) -> CoreResult<(Vec<(String, Bytes)>, bool)> {
        self.collect(start_after, filter_prefix, max)
    }

    /// Returns up to `max` keys strictly after `start_after`, in key order.
    ///
    /// The flag is true when more keys follow.
    ///
    /// # Errors
    ///
    /// Returns an error if a store scan fails.
    pub fn get_keys(&self, start_after: &str, max: usize) -> CoreResult<(Vec<String>, bool)> {
        let (pairs, more) = self.collect(start_after, "", max)?;
        Ok((pairs.into_iter().map(|(k, _)| k).collect(), more))
    }

    /// Looks up the given keys; absent keys are left out of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a store read fails.
    pub fn get_vals_by_keys<I, T>(&self, keys: I) -> CoreResult<BTreeMap<String, Bytes>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut found = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = self.lookup(key)? {
                found.insert(key.to_string(), value);
            }
        }
        Ok(found)
    }

    /// Checks every assertion against the current value of its key.
    ///
    /// An absent key (never written, tombstoned, or inside a removed range)
    /// compares as an empty value. Returns false as soon as one assertion
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns an error if a store read fails.
    pub fn cmp(&self, assertions: &BTreeMap<String, (Bytes, CmpOp)>) -> CoreResult<bool> {
        for (key, (asserted, op)) in assertions {
            let stored = self.lookup(key)?.unwrap_or_default();
            if !op.holds(&stored, asserted) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn lookup(&self, key: &str) -> CoreResult<Option<Bytes>> {
        match self.values.get(key) {
            Some(cached) => Ok(cached.value.clone()),
            None if self.ranges.covers(key) => Ok(None),
            None => Ok(self.store.get(key)?),
        }
    }

    fn store_visible(&self, key: &str) -> bool {
        !self.values.contains_key(key) && !self.ranges.covers(key)
    }

    /// Merges the journal's live values with the visible store keys.
    ///
    /// When the prefix sorts after `start_after`, both sources start at the
    /// prefix instead.
    fn collect(
        &self,
        start_after: &str,
        prefix: &str,
        max: usize,
    ) -> CoreResult<(Vec<(String, Bytes)>, bool)> {
        let seek_prefix = prefix > start_after;
        let lower = if seek_prefix {
            Bound::Included(prefix)
        } else {
            Bound::Excluded(start_after)
        };
        let mut journal = self
            .values
            .range::<str, _>((lower, Bound::Unbounded))
            .filter_map(|(k, c)| c.value.as_ref().map(|v| (k, v)))
            .peekable();

        let mut batch: VecDeque<(String, Bytes)> = VecDeque::new();
        let mut cursor: Option<String> = None;
        let mut store_done = false;

        let mut out = Vec::new();
        loop {
            while batch.is_empty() && !store_done {
                let scanned = match &cursor {
                    Some(after) => self.store.scan(after, SCAN_BATCH)?,
                    None if seek_prefix => self.store.scan_from(prefix, SCAN_BATCH)?,
                    None => self.store.scan(start_after, SCAN_BATCH)?,
                };
                store_done = scanned.len() < SCAN_BATCH;
                if let Some((last, _)) = scanned.last() {
                    cursor = Some(last.clone());
                }
                batch.extend(scanned.into_iter().filter(|(k, _)| self.store_visible(k)));
            }

            let take_store = match (batch.front(), journal.peek()) {
                (None, None) => return Ok((out, false)),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some((store_key, _)), Some((journal_key, _))) => {
                    store_key.as_str() < journal_key.as_str()
                }
            };
            let (key, value) = if take_store {
                match batch.pop_front() {
                    Some(pair) => pair,
                    None => return Ok((out, false)),
                }
            } else {
                match journal.next() {
                    Some((k, v)) => (k.clone(), v.clone()),
                    None => return Ok((out, false)),
                }
            };

            if !key.starts_with(prefix) {
                if key.as_str() > prefix {
                    return Ok((out, false));
                }
                continue;
            }
            if out.len() == max {
                return Ok((out, true));
            }
            out.push((key, value));
        }
    }
}
