//! Journal statistics.
//!
//! Counters for monitoring how much work the journal is absorbing and how
//! often objects are reset.
//!
//! # Usage
//!
//! ```rust
//! use ecomap_core::{Journal, JournalEntry, ObjectId, Version};
//!
//! let mut journal = Journal::new();
//! let oid = ObjectId::new(1, "ns", "obj");
//! journal.add_entry(oid.clone(), JournalEntry::new(Version::new(1, 1)));
//! let _ = journal.get_value_updates(&oid);
//!
//! let stats = journal.stats().snapshot();
//! assert_eq!(stats.entries_appended, 1);
//! assert_eq!(stats.entries_folded, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Journal statistics.
///
/// All counters are atomic and monotonically increasing, so they can be read
/// through a shared journal while operations are in progress.
#[derive(Debug, Default)]
pub struct JournalStats {
    // Queue counters
    /// Entries appended with `add_entry`.
    entries_appended: AtomicU64,
    /// Entries removed with `remove_entry` / `remove_entry_by_version`.
    entries_removed: AtomicU64,
    /// Entries drained into the caches by folding.
    entries_folded: AtomicU64,
    /// Fold passes that drained at least one entry.
    folds: AtomicU64,
    /// Update payloads skipped because they failed to decode.
    decode_failures: AtomicU64,

    // Lifecycle counters
    /// `clear` calls (including `clear_all` per object).
    clears: AtomicU64,
    /// `append_delete` calls.
    deletes: AtomicU64,
    /// `append_create` calls.
    creates: AtomicU64,
    /// `append_whiteout` calls.
    whiteouts: AtomicU64,
    /// Delete generations removed by `trim_delete`.
    trims: AtomicU64,
}

impl JournalStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self) {
        self.entries_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_remove(&self) {
        self.entries_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fold(&self, entries: u64) {
        self.folds.fetch_add(1, Ordering::Relaxed);
        self.entries_folded.fetch_add(entries, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clears(&self, objects: u64) {
        self.clears.fetch_add(objects, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_create(&self) {
        self.creates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_whiteout(&self) {
        self.whiteouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_trim(&self) {
        self.trims.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of appended entries.
    pub fn entries_appended(&self) -> u64 {
        self.entries_appended.load(Ordering::Relaxed)
    }

    /// Returns the number of explicitly removed entries.
    pub fn entries_removed(&self) -> u64 {
        self.entries_removed.load(Ordering::Relaxed)
    }

    /// Returns the number of entries drained by folding.
    pub fn entries_folded(&self) -> u64 {
        self.entries_folded.load(Ordering::Relaxed)
    }

    /// Returns the number of fold passes that did work.
    pub fn folds(&self) -> u64 {
        self.folds.load(Ordering::Relaxed)
    }

    /// Returns the number of skipped, undecodable update payloads.
    ///
    /// Anything non-zero means a caller appended entries without validating
    /// them.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Returns the number of per-object clears.
    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    /// Returns the number of recorded deletes.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Returns the number of recorded creates.
    pub fn creates(&self) -> u64 {
        self.creates.load(Ordering::Relaxed)
    }

    /// Returns the number of recorded whiteouts.
    pub fn whiteouts(&self) -> u64 {
        self.whiteouts.load(Ordering::Relaxed)
    }

    /// Returns the number of trimmed delete generations.
    pub fn trims(&self) -> u64 {
        self.trims.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            entries_appended: self.entries_appended(),
            entries_removed: self.entries_removed(),
            entries_folded: self.entries_folded(),
            folds: self.folds(),
            decode_failures: self.decode_failures(),
            clears: self.clears(),
            deletes: self.deletes(),
            creates: self.creates(),
            whiteouts: self.whiteouts(),
            trims: self.trims(),
        }
    }
}

/// A point-in-time snapshot of journal statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Entries appended.
    pub entries_appended: u64,
    /// Entries explicitly removed.
    pub entries_removed: u64,
    /// Entries drained by folding.
    pub entries_folded: u64,
    /// Fold passes that did work.
    pub folds: u64,
    /// Skipped, undecodable update payloads.
    pub decode_failures: u64,
    /// Per-object clears.
    pub clears: u64,
    /// Recorded deletes.
    pub deletes: u64,
    /// Recorded creates.
    pub creates: u64,
    /// Recorded whiteouts.
    pub whiteouts: u64,
    /// Trimmed delete generations.
    pub trims: u64,
}
