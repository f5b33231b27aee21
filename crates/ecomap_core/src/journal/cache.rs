//! Folded per-key and header caches.

use crate::types::Version;
use bytes::Bytes;

/// The folded state of one omap key.
///
/// `value = None` is a tombstone: the key was explicitly removed, which is
/// different from the key never having been touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    /// Version of the mutation that last touched the key.
    pub version: Version,
    /// Current value, or `None` for a removed key.
    pub value: Option<Bytes>,
}

impl CachedValue {
    /// Creates a cached value.
    #[must_use]
    pub fn new(version: Version, value: Option<Bytes>) -> Self {
        Self { version, value }
    }

    /// Overwrites version and value unconditionally.
    pub fn update(&mut self, version: Version, value: Option<Bytes>) {
        self.version = version;
        self.value = value;
    }

    /// Returns true if the key was removed.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}

/// The folded omap header.
///
/// `header = None` means no header has been recorded; a cleared omap stores
/// `Some` of an empty buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedHeader {
    /// Version of the mutation that last set the header.
    pub version: Version,
    /// Current header bytes.
    pub header: Option<Bytes>,
}

impl CachedHeader {
    /// Creates a cached header.
    #[must_use]
    pub fn new(version: Version, header: Option<Bytes>) -> Self {
        Self { version, header }
    }

    /// Overwrites version and header unconditionally.
    pub fn update(&mut self, version: Version, header: Option<Bytes>) {
        self.version = version;
        self.header = header;
    }
}
