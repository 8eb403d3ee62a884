//! Expiring key-value cache over a pluggable persistent store.
//!
//! This module provides the storage side of the data access layer:
//! - a [`Store`] trait for string key-value backends, injected wherever
//!   persistence is needed
//! - SQLite and in-memory backends
//! - an [`ExpiringCache`] that stamps entries with a write time, treats
//!   anything past its lifetime (7 days) as absent, and degrades to
//!   "no caching" when the store fills up

mod layer;
mod storage;
mod traits;

pub use layer::{ExpiringCache, CACHE_TTL_MILLIS};
pub use storage::{MemoryStore, SqliteStore};
pub use traits::Store;
