//! Core type definitions for ecomap.

use std::fmt;

/// Generation reported when an object has no pending delete.
///
/// This is the largest representable generation so every real generation
/// compares less.
pub const NO_GEN: u64 = u64::MAX;

/// Version stamped on every journaled mutation.
///
/// Versions are ordered by `(epoch, counter)`. The default version `0'0`
/// orders before every version a caller hands out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Epoch in which the mutation was accepted.
    pub epoch: u32,
    /// Position of the mutation within its epoch.
    pub counter: u64,
}

impl Version {
    /// Creates a new version.
    #[must_use]
    pub const fn new(epoch: u32, counter: u64) -> Self {
        Self { epoch, counter }
    }

    /// Returns the version immediately after this one in the same epoch.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            epoch: self.epoch,
            counter: self.counter + 1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}", self.epoch, self.counter)
    }
}

/// Identifier for an object within a pool and namespace.
///
/// The journal is generic over its object key; this is the key used by the
/// rest of the workspace and by tests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    /// Pool the object lives in.
    pub pool: i64,
    /// Namespace within the pool.
    pub namespace: String,
    /// Object name.
    pub name: String,
}

impl ObjectId {
    /// Creates a new object identifier.
    pub fn new(pool: i64, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.pool, self.namespace, self.name)
    }
}
