//! Thread-safe journal handle.

use crate::config::JournalConfig;
use crate::journal::{Journal, JournalEntry, ValueUpdates};
use crate::stats::StatsSnapshot;
use crate::types::{ObjectId, Version};
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A cloneable handle to a [`Journal`] behind one mutex.
///
/// Every operation takes the lock for its own duration. Use
/// [`with_journal`](Self::with_journal) when several operations must observe
/// the same state.
///
/// Accessors return owned copies since nothing can borrow past the lock.
#[derive(Debug)]
pub struct SharedJournal<K = ObjectId> {
    inner: Arc<Mutex<Journal<K>>>,
}

impl<K> Clone for SharedJournal<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for SharedJournal<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> From<Journal<K>> for SharedJournal<K> {
    fn from(journal: Journal<K>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(journal)),
        }
    }
}

impl<K> SharedJournal<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a handle to an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Journal::new().into()
    }

    /// Creates a handle to an empty journal with the given configuration.
    #[must_use]
    pub fn with_config(config: JournalConfig) -> Self {
        Journal::with_config(config).into()
    }

    /// Runs `f` with the journal locked.
    pub fn with_journal<R>(&self, f: impl FnOnce(&mut Journal<K>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns a copy of the configuration.
    pub fn config(&self) -> JournalConfig {
        self.inner.lock().config().clone()
    }

    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats().snapshot()
    }

    /// See [`Journal::add_entry`].
    pub fn add_entry(&self, key: K, entry: JournalEntry) {
        self.inner.lock().add_entry(key, entry);
    }

    /// See [`Journal::entries_size`].
    pub fn entries_size(&self, key: &K) -> usize {
        self.inner.lock().entries_size(key)
    }

    /// Copies the object's pending entries in append order.
    pub fn entries(&self, key: &K) -> Vec<JournalEntry> {
        self.inner.lock().entries(key).cloned().collect()
    }

    /// See [`Journal::first_entry`].
    pub fn first_entry(&self, key: &K) -> Option<JournalEntry> {
        self.inner.lock().first_entry(key).cloned()
    }

    /// See [`Journal::remove_entry`].
    pub fn remove_entry(&self, key: &K, entry: &JournalEntry) -> bool {
        self.inner.lock().remove_entry(key, entry)
    }

    /// See [`Journal::remove_entry_by_version`].
    pub fn remove_entry_by_version(&self, key: &K, version: Version) -> bool {
        self.inner.lock().remove_entry_by_version(key, version)
    }

    /// See [`Journal::clear`].
    pub fn clear(&self, key: &K) {
        self.inner.lock().clear(key);
    }

    /// See [`Journal::clear_all`].
    pub fn clear_all(&self) {
        self.inner.lock().clear_all();
    }

    /// See [`Journal::object_count`].
    pub fn object_count(&self) -> usize {
        self.inner.lock().object_count()
    }

    /// See [`Journal::is_tracked`].
    pub fn is_tracked(&self, key: &K) -> bool {
        self.inner.lock().is_tracked(key)
    }

    /// See [`Journal::get_value_updates`].
    pub fn get_value_updates(&self, key: &K) -> ValueUpdates {
        self.inner.lock().get_value_updates(key)
    }

    /// See [`Journal::get_updated_header`].
    pub fn get_updated_header(&self, key: &K) -> Option<Bytes> {
        self.inner.lock().get_updated_header(key)
    }

    /// See [`Journal::append_delete`].
    pub fn append_delete(&self, key: K, generation: u64, lost_delete: bool) {
        self.inner.lock().append_delete(key, generation, lost_delete);
    }

    /// See [`Journal::append_create`].
    pub fn append_create(&self, key: K) {
        self.inner.lock().append_create(key);
    }

    /// See [`Journal::append_whiteout`].
    pub fn append_whiteout(&self, key: K) {
        self.inner.lock().append_whiteout(key);
    }

    /// See [`Journal::get_generation`].
    pub fn get_generation(&self, key: &K) -> (u64, bool) {
        self.inner.lock().get_generation(key)
    }

    /// See [`Journal::trim_delete`].
    pub fn trim_delete(&self, key: &K, generation: u64) {
        self.inner.lock().trim_delete(key, generation);
    }
}
