//! # ecomap Store
//!
//! Backing object-map store abstraction for ecomap.
//!
//! This crate provides the lowest-level view of an object's omap: an ordered
//! map of string keys to opaque values, plus an optional header blob. The
//! journal in `ecomap_core` folds deferred mutations and applies them to an
//! [`OmapStore`] when the caller decides to; reads can be served through an
//! overlay before that happens.
//!
//! ## Design Principles
//!
//! - Stores know nothing about journal entries, versions or generations
//! - Range deletes use half-open `[start, end)` intervals, `None` end is unbounded
//! - Must be `Send + Sync` so one store can back several readers
//!
//! ## Available Stores
//!
//! - [`InMemoryOmapStore`] - For testing and ephemeral objects
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use ecomap_store::{InMemoryOmapStore, OmapStore};
//! use std::collections::BTreeMap;
//!
//! let mut store = InMemoryOmapStore::new();
//! let mut vals = BTreeMap::new();
//! vals.insert("key_001".to_string(), Bytes::from_static(b"val"));
//! store.set_keys(&vals).unwrap();
//! assert_eq!(store.get("key_001").unwrap(), Some(Bytes::from_static(b"val")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;

pub use backend::OmapStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryOmapStore;
