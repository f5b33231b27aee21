//! # ecomap Core
//!
//! Per-object omap update journal for erasure-coded pools.
//!
//! Erasure-coded objects cannot apply omap mutations in place as they
//! arrive. This crate journals them per object and folds them lazily:
//! - Versioned journal entries (full clear, header replacement, key updates)
//! - Folded key cache with tombstones, merged removed-range set, header cache
//! - Delete, create and whiteout bookkeeping with pending delete generations
//! - Two-phase apply to an [`OmapStore`](ecomap_store::OmapStore) and a read
//!   overlay that answers omap reads before the apply happens
//!
//! ## Example
//!
//! ```rust
//! use ecomap_core::{Journal, JournalEntry, ObjectId, OmapUpdate, Version};
//!
//! let mut journal = Journal::new();
//! let oid = ObjectId::new(3, "", "rbd_data.1");
//!
//! let entry = JournalEntry::new(Version::new(7, 1))
//!     .with_update(&OmapUpdate::insert([("key_001", "a"), ("key_002", "b")]))
//!     .unwrap()
//!     .with_update(&OmapUpdate::remove_range("key_002", None::<String>))
//!     .unwrap();
//! journal.add_entry(oid.clone(), entry);
//!
//! let (values, ranges) = journal.get_value_updates(&oid);
//! assert_eq!(values.len(), 2);
//! assert_eq!(ranges.get("key_002"), Some(None));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod journal;
mod overlay;
mod shared;
mod stats;
mod types;

pub use config::JournalConfig;
pub use ecomap_codec::{OmapUpdate, UpdateKind};
pub use error::{CoreError, CoreResult};
pub use journal::{CachedHeader, CachedValue, Journal, JournalEntry, RemovedRanges, ValueUpdates};
pub use overlay::{apply_header, apply_value_updates, CmpOp, OmapOverlay};
pub use shared::SharedJournal;
pub use stats::{JournalStats, StatsSnapshot};
pub use types::{ObjectId, Version, NO_GEN};
