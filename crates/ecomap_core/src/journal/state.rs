//! Per-object journal state and the folding algorithm.

use crate::journal::cache::{CachedHeader, CachedValue};
use crate::journal::entry::JournalEntry;
use crate::journal::ranges::RemovedRanges;
use crate::stats::JournalStats;
use crate::types::{Version, NO_GEN};
use bytes::Bytes;
use ecomap_codec::OmapUpdate;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::Bound;
use tracing::warn;

/// Everything the journal tracks for one object.
#[derive(Debug, Default)]
pub(crate) struct ObjectJournal {
    /// Entries not yet folded, in append (= version) order.
    pending: VecDeque<JournalEntry>,
    /// Folded key state.
    values: BTreeMap<String, CachedValue>,
    /// Folded range removals.
    ranges: RemovedRanges,
    /// Folded header.
    header: CachedHeader,
    /// Pending delete generations with their lost flag.
    deletions: BTreeSet<(u64, bool)>,
}

impl ObjectJournal {
    pub(crate) fn push(&mut self, entry: JournalEntry) -> usize {
        self.pending.push_back(entry);
        self.pending.len()
    }

    pub(crate) fn pending(&self) -> &VecDeque<JournalEntry> {
        &self.pending
    }

    pub(crate) fn remove_by_version(&mut self, version: Version) -> bool {
        match self.pending.iter().position(|e| e.version == version) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drops pending entries and resets the caches. Deletions are kept.
    pub(crate) fn reset(&mut self) {
        self.pending.clear();
        self.values.clear();
        self.ranges.clear();
        self.header = CachedHeader::default();
    }

    pub(crate) fn record_delete(&mut self, generation: u64, lost: bool) {
        self.deletions.insert((generation, lost));
    }

    /// Removes every delete recorded at `generation`; returns how many.
    pub(crate) fn trim_delete(&mut self, generation: u64) -> usize {
        let before = self.deletions.len();
        self.deletions.remove(&(generation, false));
        self.deletions.remove(&(generation, true));
        before - self.deletions.len()
    }

    pub(crate) fn generation(&self) -> (u64, bool) {
        self.deletions.first().copied().unwrap_or((NO_GEN, false))
    }

    /// True when dropping this state would not change any query result.
    pub(crate) fn is_idle(&self) -> bool {
        self.pending.is_empty()
            && self.values.is_empty()
            && self.ranges.is_empty()
            && self.header == CachedHeader::default()
            && self.deletions.is_empty()
    }

    pub(crate) fn values(&self) -> &BTreeMap<String, CachedValue> {
        &self.values
    }

    pub(crate) fn ranges(&self) -> &RemovedRanges {
        &self.ranges
    }

    pub(crate) fn header(&self) -> Option<&Bytes> {
        self.header.header.as_ref()
    }

    /// Drains every pending entry into the caches; returns how many folded.
    pub(crate) fn fold(&mut self, stats: &JournalStats) -> usize {
        let count = self.pending.len();
        while let Some(entry) = self.pending.pop_front() {
            self.apply(&entry, stats);
        }
        count
    }

    fn apply(&mut self, entry: &JournalEntry, stats: &JournalStats) {
        let version = entry.version;

        if entry.clear_omap {
            self.values.clear();
            self.ranges.clear_omap();
            self.header.update(version, Some(Bytes::new()));
        }

        if let Some(header) = &entry.header {
            self.header.update(version, Some(header.clone()));
        }

        for (index, update) in entry.decode_updates().enumerate() {
            let update = match update {
                Ok(update) => update,
                Err(err) => {
                    stats.record_decode_failure();
                    warn!(%version, index, error = %err, "skipping undecodable omap update");
                    continue;
                }
            };

            match update {
                OmapUpdate::Insert(map) => {
                    for (key, value) in map {
                        self.set_value(key, version, Some(value));
                    }
                }
                OmapUpdate::Remove(keys) => {
                    for key in keys {
                        self.set_value(key, version, None);
                    }
                }
                OmapUpdate::RemoveRange { start, end } => {
                    self.remove_range(version, start, end);
                }
            }
        }
    }

    fn set_value(&mut self, key: String, version: Version, value: Option<Bytes>) {
        match self.values.get_mut(&key) {
            Some(cached) => cached.update(version, value),
            None => {
                self.values.insert(key, CachedValue::new(version, value));
            }
        }
    }

    /// Records the range and tombstones cached keys it covers that were
    /// written before `version`. Keys written at or after `version` survive.
    fn remove_range(&mut self, version: Version, start: String, end: Option<String>) {
        if matches!(&end, Some(e) if *e <= start) {
            return;
        }

        let upper = match &end {
            Some(e) => Bound::Excluded(e.as_str()),
            None => Bound::Unbounded,
        };
        for (_, cached) in self
            .values
            .range_mut::<str, _>((Bound::Included(start.as_str()), upper))
        {
            if cached.version < version {
                cached.update(version, None);
            }
        }

        self.ranges.add_range(start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(version: Version, keys: &[&str]) -> JournalEntry {
        JournalEntry::new(version)
            .with_update(&OmapUpdate::insert(keys.iter().map(|k| (*k, "val"))))
            .unwrap()
    }

    fn remove_range(version: Version, start: &str, end: Option<&str>) -> JournalEntry {
        JournalEntry::new(version)
            .with_update(&OmapUpdate::remove_range(start, end))
            .unwrap()
    }

    #[test]
    fn fold_drains_pending() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        state.push(insert(Version::new(1, 1), &["a"]));
        state.push(insert(Version::new(1, 2), &["b"]));

        assert_eq!(state.fold(&stats), 2);
        assert!(state.pending().is_empty());
        assert_eq!(state.values().len(), 2);
        assert_eq!(state.fold(&stats), 0);
    }

    #[test]
    fn range_tombstones_only_older_keys() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        state.push(insert(Version::new(1, 1), &["b", "x"]));
        state.push(remove_range(Version::new(1, 2), "a", Some("c")));
        state.push(insert(Version::new(1, 3), &["b2"]));
        state.fold(&stats);

        assert!(state.values()["b"].is_tombstone());
        assert_eq!(state.values()["b"].version, Version::new(1, 2));
        assert!(!state.values()["b2"].is_tombstone());
        assert!(!state.values()["x"].is_tombstone());
    }

    #[test]
    fn range_does_not_tombstone_same_version_key() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        let entry = JournalEntry::new(Version::new(1, 1))
            .with_update(&OmapUpdate::insert([("b", "val")]))
            .unwrap()
            .with_update(&OmapUpdate::remove_range("a", Some("c")))
            .unwrap();
        state.push(entry);
        state.fold(&stats);

        assert!(!state.values()["b"].is_tombstone());
        assert_eq!(state.ranges().len(), 1);
    }

    #[test]
    fn clear_applies_before_same_entry_updates() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        state.push(insert(Version::new(1, 1), &["old"]));
        let entry = JournalEntry::new(Version::new(1, 2))
            .with_clear(true)
            .with_header("fresh")
            .with_update(&OmapUpdate::insert([("new", "val")]))
            .unwrap();
        state.push(entry);
        state.fold(&stats);

        assert!(!state.values().contains_key("old"));
        assert!(state.values().contains_key("new"));
        assert_eq!(state.header(), Some(&Bytes::from("fresh")));
        assert_eq!(state.ranges().get(""), Some(None));
    }

    #[test]
    fn undecodable_update_is_skipped() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        let entry = JournalEntry::new(Version::new(1, 1))
            .with_raw_update(ecomap_codec::UpdateKind::Remove, &b"\x00"[..])
            .with_update(&OmapUpdate::insert([("k", "v")]))
            .unwrap();
        state.push(entry);
        state.fold(&stats);

        assert_eq!(stats.decode_failures(), 1);
        assert!(state.values().contains_key("k"));
    }

    #[test]
    fn generations_track_minimum() {
        let mut state = ObjectJournal::default();
        assert_eq!(state.generation(), (NO_GEN, false));

        state.record_delete(5, true);
        state.record_delete(8, false);
        assert_eq!(state.generation(), (5, true));

        assert_eq!(state.trim_delete(5), 1);
        assert_eq!(state.generation(), (8, false));
        assert_eq!(state.trim_delete(42), 0);
    }

    #[test]
    fn reset_keeps_deletions() {
        let stats = JournalStats::new();
        let mut state = ObjectJournal::default();
        state.push(insert(Version::new(1, 1), &["a"]));
        state.fold(&stats);
        state.record_delete(3, false);

        state.reset();

        assert!(state.values().is_empty());
        assert_eq!(state.generation(), (3, false));
        assert!(!state.is_idle());
    }
}
