//! Cache Entry Module
//!
//! Defines a single cached origin response.

// == Cache Entry ==
/// A cached response keyed by the literal request URI.
///
/// Entries are immutable once created; a cache hit only changes their
/// position in the recency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    key: String,
    payload: Box<[u8]>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry, taking ownership of the payload buffer.
    pub fn new(key: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into_boxed_slice(),
        }
    }

    /// The request URI this entry answers.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Exact, case-sensitive key comparison.
    pub fn matches(&self, key: &str) -> bool {
        self.key == key
    }
}
