//! Cache Module
//!
//! Provides the in-memory response cache with byte-bounded LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::Mutex;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::{Handle, RecencyList};
pub use stats::CacheStats;
pub use store::{CacheStore, InsertOutcome};

// == Public Constants ==
/// Largest response eligible for caching, in bytes
pub const MAX_OBJECT_SIZE: usize = 100 * 1024; // 100 KiB

/// Total payload bytes the cache may hold
pub const MAX_CACHE_SIZE: usize = 1024 * 1024; // 1 MiB

/// The single store shared by every connection task.
///
/// One exclusive lock guards lookup, insert (with its eviction) and teardown.
pub type SharedCache = Arc<Mutex<CacheStore>>;

/// Wraps a store for sharing across connection tasks.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(Mutex::new(store))
}
