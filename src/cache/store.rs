//! Cache Store Module
//!
//! Main cache engine: a byte-bounded store of origin responses kept in LRU order.

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyList, MAX_CACHE_SIZE, MAX_OBJECT_SIZE};
use crate::error::CacheError;

// == Insert Outcome ==
/// What `CacheStore::insert` did with an accepted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored at the head; `evicted_bytes` were freed to make room
    Inserted { evicted_bytes: usize },
    /// Another writer cached the same key first; nothing was stored
    AlreadyCached,
}

// == Cache Store ==
/// Byte-bounded response cache with LRU eviction.
///
/// Invariants after every operation:
/// - the sum of payload sizes never exceeds `max_cache_size`
/// - no payload exceeds `max_object_size`
/// - keys are unique among live entries
#[derive(Debug)]
pub struct CacheStore {
    /// Entries in recency order (head = MRU)
    entries: RecencyList<CacheEntry>,
    /// Sum of payload sizes currently stored
    current_size: usize,
    max_cache_size: usize,
    max_object_size: usize,
    /// Performance statistics
    stats: CacheStats,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with the standard limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_CACHE_SIZE, MAX_OBJECT_SIZE)
    }

    /// Creates an empty store with explicit limits.
    ///
    /// # Arguments
    /// * `max_cache_size` - Total payload bytes the store may hold
    /// * `max_object_size` - Largest single payload eligible for caching
    pub fn with_limits(max_cache_size: usize, max_object_size: usize) -> Self {
        Self {
            entries: RecencyList::new(),
            current_size: 0,
            max_cache_size,
            max_object_size,
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Finds the entry for `key` and marks it most recently used.
    ///
    /// The returned slice borrows the store, so callers copy it out while
    /// still holding the store lock.
    pub fn lookup(&mut self, key: &str) -> Option<&[u8]> {
        match self.entries.find(|entry| entry.matches(key)) {
            Some(handle) => {
                self.entries.move_to_front(handle);
                self.stats.record_hit();
                self.entries.get(handle).map(CacheEntry::payload)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Caches `payload` under `key`, evicting LRU entries if needed.
    ///
    /// The key is re-checked first; when a concurrent writer already cached
    /// it, that entry is refreshed and the new payload is dropped.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        payload: Vec<u8>,
    ) -> Result<InsertOutcome, CacheError> {
        let key = key.into();
        let size = payload.len();

        if size > self.max_object_size {
            self.stats.record_rejection();
            return Err(CacheError::ObjectTooLarge {
                size,
                limit: self.max_object_size,
            });
        }
        if size > self.max_cache_size {
            self.stats.record_rejection();
            return Err(CacheError::ExceedsCapacity {
                size,
                capacity: self.max_cache_size,
            });
        }

        if let Some(handle) = self.entries.find(|entry| entry.matches(&key)) {
            self.entries.move_to_front(handle);
            self.stats.record_duplicate();
            debug!(key = %key, "Entry already cached, skipping insert");
            return Ok(InsertOutcome::AlreadyCached);
        }

        let mut evicted_bytes = 0;
        if self.current_size + size > self.max_cache_size {
            evicted_bytes = match self.evict(size) {
                Ok(freed) => freed,
                // Whole store consumed; the size guard above means the object now fits.
                Err(CacheError::EvictionExhausted { freed, .. }) if self.entries.is_empty() => freed,
                Err(err) => return Err(err),
            };
        }

        self.entries.push_front(CacheEntry::new(key, payload));
        self.current_size += size;
        self.stats.record_insertion();

        Ok(InsertOutcome::Inserted { evicted_bytes })
    }

    // == Evict ==
    /// Removes entries from the tail until at least `target` bytes are freed.
    ///
    /// Returns the number of bytes freed. Fails with `EvictionExhausted` if
    /// the list empties first.
    pub fn evict(&mut self, target: usize) -> Result<usize, CacheError> {
        let mut freed = 0;

        while freed < target {
            let Some(entry) = self.entries.pop_back() else {
                return Err(CacheError::EvictionExhausted { freed, target });
            };
            freed += entry.size();
            self.current_size -= entry.size();
            self.stats.record_eviction();
            debug!(key = %entry.key(), size = entry.size(), "Evicted entry");
        }

        Ok(freed)
    }

    // == Teardown ==
    /// Releases every entry and resets the byte total.
    ///
    /// Returns the number of entries and bytes released.
    pub fn teardown(&mut self) -> (usize, usize) {
        let released = (self.entries.len(), self.current_size);
        self.entries.clear();
        self.current_size = 0;
        released
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.current_size);
        stats
    }

    /// Entries from most to least recently used.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter()
    }

    /// Sum of cached payload sizes.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    pub fn capacity(&self) -> usize {
        self.max_cache_size
    }

    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(store: &CacheStore) -> Vec<String> {
        store.entries().map(|e| e.key().to_string()).collect()
    }

    fn payload(len: usize) -> Vec<u8> {
        vec![b'x'; len]
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert!(store.is_empty());
        assert_eq!(store.current_size(), 0);
        assert_eq!(store.capacity(), MAX_CACHE_SIZE);
        assert_eq!(store.max_object_size(), MAX_OBJECT_SIZE);
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = CacheStore::new();

        store.insert("http://a/", b"hello".to_vec()).unwrap();

        assert_eq!(store.lookup("http://a/"), Some(&b"hello"[..]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_size(), 5);
    }

    #[test]
    fn test_store_lookup_miss() {
        let mut store = CacheStore::new();
        assert!(store.lookup("http://nowhere/").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_lookup_moves_entry_to_head() {
        let mut store = CacheStore::with_limits(100, 100);
        store.insert("a", payload(1)).unwrap();
        store.insert("b", payload(1)).unwrap();
        store.insert("c", payload(1)).unwrap();

        store.lookup("a").unwrap();

        assert_eq!(keys(&store), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_insert_evicts_lru_until_object_fits() {
        let mut store = CacheStore::with_limits(10, 10);
        store.insert("a", payload(3)).unwrap();
        store.insert("b", payload(3)).unwrap();
        store.insert("c", payload(3)).unwrap();

        // 9 + 4 > 10: target is 4 bytes, so "a" (3) and "b" (3) go.
        let outcome = store.insert("d", payload(4)).unwrap();

        assert_eq!(outcome, InsertOutcome::Inserted { evicted_bytes: 6 });
        assert_eq!(keys(&store), vec!["d", "c"]);
        assert_eq!(store.current_size(), 7);
        assert_eq!(store.stats().evictions, 2);
    }

    #[test]
    fn test_eviction_respects_recency() {
        let mut store = CacheStore::with_limits(10, 10);
        store.insert("a", payload(5)).unwrap();
        store.insert("b", payload(5)).unwrap();

        store.lookup("a").unwrap();
        store.insert("c", payload(5)).unwrap();

        assert_eq!(keys(&store), vec!["c", "a"]);
    }

    #[test]
    fn test_insert_empties_store_when_needed() {
        let mut store = CacheStore::with_limits(10, 10);
        store.insert("a", payload(2)).unwrap();
        store.insert("b", payload(2)).unwrap();

        // 4 + 8 > 10 and only 4 bytes are evictable; the empty store still fits it.
        let outcome = store.insert("c", payload(8)).unwrap();

        assert_eq!(outcome, InsertOutcome::Inserted { evicted_bytes: 4 });
        assert_eq!(keys(&store), vec!["c"]);
        assert_eq!(store.current_size(), 8);
    }

    #[test]
    fn test_evict_on_empty_store_fails() {
        let mut store = CacheStore::with_limits(10, 10);
        assert_eq!(
            store.evict(1),
            Err(CacheError::EvictionExhausted {
                freed: 0,
                target: 1
            })
        );
    }

    #[test]
    fn test_evict_zero_target_is_noop() {
        let mut store = CacheStore::with_limits(10, 10);
        store.insert("a", payload(2)).unwrap();

        assert_eq!(store.evict(0), Ok(0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_object_size_boundary() {
        let mut store = CacheStore::new();

        assert!(store.insert("exact", payload(MAX_OBJECT_SIZE)).is_ok());
        assert_eq!(
            store.insert("over", payload(MAX_OBJECT_SIZE + 1)),
            Err(CacheError::ObjectTooLarge {
                size: MAX_OBJECT_SIZE + 1,
                limit: MAX_OBJECT_SIZE
            })
        );
        assert!(store.lookup("over").is_none());
        assert_eq!(store.stats().rejected, 1);
    }

    #[test]
    fn test_object_larger_than_cache_is_rejected() {
        // Object limit above the cache capacity: eviction could never succeed.
        let mut store = CacheStore::with_limits(10, 100);
        store.insert("a", payload(5)).unwrap();

        let result = store.insert("huge", payload(11));

        assert_eq!(
            result,
            Err(CacheError::ExceedsCapacity {
                size: 11,
                capacity: 10
            })
        );
        // Nothing was evicted on the way.
        assert_eq!(keys(&store), vec!["a"]);
    }

    #[test]
    fn test_duplicate_insert_is_skipped() {
        let mut store = CacheStore::with_limits(100, 100);
        store.insert("a", b"first".to_vec()).unwrap();
        store.insert("b", b"other".to_vec()).unwrap();

        let outcome = store.insert("a", b"second".to_vec()).unwrap();

        assert_eq!(outcome, InsertOutcome::AlreadyCached);
        assert_eq!(store.len(), 2);
        assert_eq!(keys(&store), vec!["a", "b"]);
        assert_eq!(store.lookup("a"), Some(&b"first"[..]));
        assert_eq!(store.stats().duplicates, 1);
    }

    #[test]
    fn test_empty_payload_is_cacheable() {
        let mut store = CacheStore::new();
        store.insert("empty", Vec::new()).unwrap();
        assert_eq!(store.lookup("empty"), Some(&b""[..]));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut store = CacheStore::with_limits(100, 100);
        store.insert("a", payload(10)).unwrap();
        store.insert("b", payload(20)).unwrap();

        assert_eq!(store.teardown(), (2, 30));
        assert!(store.is_empty());
        assert_eq!(store.current_size(), 0);
        assert!(store.lookup("a").is_none());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();
        store.insert("a", payload(10)).unwrap();
        store.lookup("a"); // hit
        store.lookup("b"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_bytes, 10);
    }
}
