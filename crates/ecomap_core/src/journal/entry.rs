//! Journal entries.

use crate::error::{CoreError, CoreResult};
use crate::types::Version;
use bytes::Bytes;
use ecomap_codec::{decode_update, encode_update, CodecResult, OmapUpdate, UpdateKind};

/// One versioned batch of omap mutations awaiting folding.
///
/// Within an entry, a full clear applies first, then the header replacement,
/// then `updates` in list order.
///
/// Two entries are equal when their versions are equal; content is not
/// compared. This is what `remove_entry` matches on.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    /// Version of the operation that produced this entry.
    pub version: Version,
    /// Whether the whole omap is cleared before the rest of the entry applies.
    pub clear_omap: bool,
    /// Replacement header; `None` leaves the header untouched.
    pub header: Option<Bytes>,
    /// Encoded updates, applied in order.
    pub updates: Vec<(UpdateKind, Bytes)>,
}

impl JournalEntry {
    /// Creates an entry that changes nothing.
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            version,
            clear_omap: false,
            header: None,
            updates: Vec::new(),
        }
    }

    /// Creates an entry from all of its parts.
    #[must_use]
    pub fn from_parts(
        version: Version,
        clear_omap: bool,
        header: Option<Bytes>,
        updates: Vec<(UpdateKind, Bytes)>,
    ) -> Self {
        Self {
            version,
            clear_omap,
            header,
            updates,
        }
    }

    /// Sets whether the entry clears the omap first.
    #[must_use]
    pub fn with_clear(mut self, clear_omap: bool) -> Self {
        self.clear_omap = clear_omap;
        self
    }

    /// Sets the replacement header.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<Bytes>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Appends an already-encoded update.
    #[must_use]
    pub fn with_raw_update(mut self, kind: UpdateKind, payload: impl Into<Bytes>) -> Self {
        self.updates.push((kind, payload.into()));
        self
    }

    /// Encodes `update` and appends it.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be encoded.
    pub fn with_update(mut self, update: &OmapUpdate) -> CodecResult<Self> {
        self.updates.push(encode_update(update)?);
        Ok(self)
    }

    /// Decodes every update in order.
    pub fn decode_updates(&self) -> impl Iterator<Item = CodecResult<OmapUpdate>> + '_ {
        self.updates
            .iter()
            .map(|(kind, payload)| decode_update(*kind, payload))
    }

    /// Checks that every payload decodes and every range is well formed.
    ///
    /// Folding tolerates malformed payloads by skipping them; callers that
    /// would rather reject such an entry up front validate it before
    /// appending.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] for an undecodable payload and
    /// [`CoreError::InvalidOperation`] for a range whose end precedes its
    /// start.
    pub fn validate(&self) -> CoreResult<()> {
        for update in self.decode_updates() {
            if let OmapUpdate::RemoveRange {
                start,
                end: Some(end),
            } = update?
            {
                if end < start {
                    return Err(CoreError::invalid_operation(format!(
                        "remove_range end {end:?} precedes start {start:?} at {}",
                        self.version
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for JournalEntry {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for JournalEntry {}
