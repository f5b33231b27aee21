//! The per-object omap journal.
//!
//! Updates to an object's omap are journaled as versioned entries and folded
//! lazily into three caches:
//! - **Key cache**: latest value or tombstone per key
//! - **Removed ranges**: merged set of key intervals removed wholesale
//! - **Header cache**: latest header, if any was recorded
//!
//! Each object also tracks its pending delete generations.

mod cache;
mod entry;
mod manager;
mod ranges;
mod state;

pub use cache::{CachedHeader, CachedValue};
pub use entry::JournalEntry;
pub use manager::{Journal, ValueUpdates};
pub use ranges::{range_contains, RemovedRanges};
