//! Update kinds and decoded update values.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The kind tag carried next to every update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateKind {
    /// Upsert a set of key/value pairs.
    Insert,
    /// Tombstone a set of keys.
    Remove,
    /// Remove every key in a half-open interval.
    RemoveRange,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::RemoveRange => "remove_range",
        };
        f.write_str(name)
    }
}

/// A decoded object-map update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmapUpdate {
    /// Keys to set, with their new values.
    Insert(BTreeMap<String, Bytes>),
    /// Keys to remove.
    Remove(BTreeSet<String>),
    /// Remove every key in `[start, end)`; `end = None` runs to the end of
    /// the keyspace.
    RemoveRange {
        /// Inclusive lower bound. The empty string is the minimum key.
        start: String,
        /// Exclusive upper bound, or unbounded.
        end: Option<String>,
    },
}

impl OmapUpdate {
    /// Builds an insert update from key/value pairs.
    pub fn insert<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Bytes>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Insert(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a remove update from keys.
    pub fn remove<K, I>(keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        Self::Remove(keys.into_iter().map(Into::into).collect())
    }

    /// Builds a range removal.
    pub fn remove_range(start: impl Into<String>, end: Option<impl Into<String>>) -> Self {
        Self::RemoveRange {
            start: start.into(),
            end: end.map(Into::into),
        }
    }

    /// Returns the kind tag for this update.
    #[must_use]
    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::Insert(_) => UpdateKind::Insert,
            Self::Remove(_) => UpdateKind::Remove,
            Self::RemoveRange { .. } => UpdateKind::RemoveRange,
        }
    }
}
