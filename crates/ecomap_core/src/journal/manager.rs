//! The object-map journal.

use crate::config::JournalConfig;
use crate::journal::cache::CachedValue;
use crate::journal::entry::JournalEntry;
use crate::journal::ranges::RemovedRanges;
use crate::journal::state::ObjectJournal;
use crate::overlay::OmapOverlay;
use crate::stats::JournalStats;
use crate::types::{ObjectId, Version, NO_GEN};
use bytes::Bytes;
use ecomap_store::OmapStore;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Folded key updates and removed ranges for one object.
pub type ValueUpdates = (BTreeMap<String, CachedValue>, RemovedRanges);

/// Per-object omap update journal.
///
/// The journal keeps, for every object it has seen, a FIFO of pending
/// [`JournalEntry`] values plus the caches those entries fold into, and the
/// object's pending delete generations.
///
/// ## Ordering
///
/// The journal performs no locking and no ordering checks. Callers append
/// entries for one object in non-decreasing version order from a single
/// mutation stream. If that is violated, inserts and removes resolve as
/// "last appended wins", and a range removal only tombstones keys cached at
/// a strictly lower version.
///
/// ## Folding
///
/// Accessors ([`get_value_updates`](Self::get_value_updates),
/// [`get_updated_header`](Self::get_updated_header)) fold pending entries
/// first and return owned copies. Folded state stays cached until the object
/// is cleared, deleted, created or whited out.
///
/// # Example
///
/// ```rust
/// use ecomap_core::{Journal, JournalEntry, ObjectId, OmapUpdate, Version};
///
/// let mut journal = Journal::new();
/// let oid = ObjectId::new(1, "ns", "obj");
///
/// let entry = JournalEntry::new(Version::new(1, 1))
///     .with_update(&OmapUpdate::insert([("key_001", "val")]))
///     .unwrap();
/// journal.add_entry(oid.clone(), entry);
///
/// let (values, ranges) = journal.get_value_updates(&oid);
/// assert!(values["key_001"].value.is_some());
/// assert!(ranges.is_empty());
/// assert_eq!(journal.entries_size(&oid), 0);
/// ```
#[derive(Debug)]
pub struct Journal<K = ObjectId> {
    /// Per-object state.
    objects: HashMap<K, ObjectJournal>,
    /// Configuration.
    config: JournalConfig,
    /// Counters.
    stats: JournalStats,
}

impl<K> Default for Journal<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Journal<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates an empty journal with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(JournalConfig::default())
    }

    /// Creates an empty journal with the given configuration.
    #[must_use]
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            objects: HashMap::new(),
            config,
            stats: JournalStats::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Returns the statistics counters.
    pub fn stats(&self) -> &JournalStats {
        &self.stats
    }

    // === Queue management ===

    /// Appends an entry to the object's pending queue.
    pub fn add_entry(&mut self, key: K, entry: JournalEntry) {
        let version = entry.version;
        let threshold = self.config.pending_warn_threshold;
        let pending = self.objects.entry(key.clone()).or_default().push(entry);
        self.stats.record_append();

        if threshold > 0 && pending == threshold {
            warn!(object = ?key, pending, "omap journal backlog reached warning threshold");
        }
        trace!(object = ?key, %version, pending, "journaled omap entry");
    }

    /// Returns the number of entries still pending (not yet folded).
    pub fn entries_size(&self, key: &K) -> usize {
        self.objects.get(key).map_or(0, |s| s.pending().len())
    }

    /// Iterates the object's pending entries in append order.
    ///
    /// Folded results are not visible here.
    pub fn entries<'a>(&'a self, key: &K) -> impl ExactSizeIterator<Item = &'a JournalEntry> + 'a {
        self.objects
            .get(key)
            .map(|s| s.pending().iter())
            .unwrap_or_default()
    }

    /// Returns the oldest pending entry.
    pub fn first_entry(&self, key: &K) -> Option<&JournalEntry> {
        self.objects.get(key).and_then(|s| s.pending().front())
    }

    /// Removes the first pending entry with the same version as `entry`.
    ///
    /// Returns false if no such entry is pending. Folded state is untouched.
    pub fn remove_entry(&mut self, key: &K, entry: &JournalEntry) -> bool {
        self.remove_entry_by_version(key, entry.version)
    }

    /// Removes the first pending entry with the given version.
    ///
    /// Returns false if no such entry is pending. Folded state is untouched.
    pub fn remove_entry_by_version(&mut self, key: &K, version: Version) -> bool {
        let removed = self
            .objects
            .get_mut(key)
            .is_some_and(|s| s.remove_by_version(version));
        if removed {
            self.stats.record_remove();
            trace!(object = ?key, %version, "removed pending omap entry");
            self.reclaim_if_idle(key);
        }
        removed
    }

    /// Drops the object's pending entries and folded caches.
    ///
    /// Pending delete generations are kept.
    pub fn clear(&mut self, key: &K) {
        if let Some(state) = self.objects.get_mut(key) {
            state.reset();
            self.stats.record_clears(1);
            debug!(object = ?key, "cleared omap journal");
            self.reclaim_if_idle(key);
        }
    }

    /// Resets the whole journal.
    ///
    /// Every object's pending entries, folded caches and delete generations
    /// are dropped.
    pub fn clear_all(&mut self) {
        let objects = self.objects.len();
        self.stats.record_clears(objects as u64);
        self.objects.clear();
        debug!(objects, "cleared all omap journals");
    }

    /// Returns the number of objects with tracked state.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the journal holds any state for the object.
    pub fn is_tracked(&self, key: &K) -> bool {
        self.objects.contains_key(key)
    }

    // === Folding ===

    /// Folds pending entries and returns the cumulative key updates and
    /// removed ranges.
    ///
    /// Apply the result in two phases: delete every key inside each removed
    /// range, then apply the key map (set values, remove tombstones).
    pub fn get_value_updates(&mut self, key: &K) -> ValueUpdates {
        match self.fold(key) {
            Some(state) => (state.values().clone(), state.ranges().clone()),
            None => (BTreeMap::new(), RemovedRanges::new()),
        }
    }

    /// Folds pending entries and returns the current header.
    ///
    /// `None` means no header has been recorded; a cleared omap yields an
    /// empty header.
    pub fn get_updated_header(&mut self, key: &K) -> Option<Bytes> {
        self.fold(key).and_then(|state| state.header().cloned())
    }

    /// Folds pending entries and returns a read view of the object's omap
    /// over `store`.
    ///
    /// The view holds a copy of the folded state; later journal changes are
    /// not reflected in it.
    pub fn overlay<'a, S>(&mut self, key: &K, store: &'a S) -> OmapOverlay<'a, S>
    where
        S: OmapStore + ?Sized,
    {
        match self.fold(key) {
            Some(state) => OmapOverlay::new(
                store,
                state.values().clone(),
                state.ranges().clone(),
                state.header().cloned(),
            ),
            None => OmapOverlay::new(store, BTreeMap::new(), RemovedRanges::new(), None),
        }
    }

    fn fold(&mut self, key: &K) -> Option<&ObjectJournal> {
        let state = self.objects.get_mut(key)?;
        let folded = state.fold(&self.stats);
        if folded > 0 {
            self.stats.record_fold(folded as u64);
            trace!(object = ?key, folded, "folded omap journal");
        }
        Some(&*state)
    }

    // === Object lifecycle ===

    /// Records a delete at `generation` and drops the object's pending
    /// entries and folded caches.
    ///
    /// Several deletes may be outstanding for one object; each stays until
    /// trimmed.
    pub fn append_delete(&mut self, key: K, generation: u64, lost_delete: bool) {
        let state = self.objects.entry(key.clone()).or_default();
        state.record_delete(generation, lost_delete);
        state.reset();
        self.stats.record_delete();
        debug!(object = ?key, generation, lost_delete, "journaled object delete");
    }

    /// Drops the object's pending entries and folded caches for a newly
    /// created object.
    ///
    /// Pending delete generations are kept; trimming them is up to the
    /// compaction path.
    pub fn append_create(&mut self, key: K) {
        self.objects.entry(key.clone()).or_default().reset();
        self.stats.record_create();
        debug!(object = ?key, "journaled object create");
        self.reclaim_if_idle(&key);
    }

    /// Drops the object's pending entries and folded caches for a whiteout.
    ///
    /// The header reads as unrecorded afterwards. Pending delete generations
    /// are kept.
    pub fn append_whiteout(&mut self, key: K) {
        self.objects.entry(key.clone()).or_default().reset();
        self.stats.record_whiteout();
        debug!(object = ?key, "journaled object whiteout");
        self.reclaim_if_idle(&key);
    }

    /// Returns the lowest pending delete generation and its lost flag, or
    /// `(NO_GEN, false)` if none is pending.
    pub fn get_generation(&self, key: &K) -> (u64, bool) {
        self.objects
            .get(key)
            .map_or((NO_GEN, false), ObjectJournal::generation)
    }

    /// Removes the pending delete at `generation`.
    ///
    /// Trimming an unknown generation or object is a no-op.
    pub fn trim_delete(&mut self, key: &K, generation: u64) {
        let trimmed = self
            .objects
            .get_mut(key)
            .map_or(0, |s| s.trim_delete(generation));
        if trimmed > 0 {
            self.stats.record_trim();
            debug!(object = ?key, generation, "trimmed object delete");
            self.reclaim_if_idle(key);
        }
    }

    fn reclaim_if_idle(&mut self, key: &K) {
        if self.config.reclaim_idle_objects
            && self.objects.get(key).is_some_and(ObjectJournal::is_idle)
        {
            self.objects.remove(key);
        }
    }
}
