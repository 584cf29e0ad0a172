//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Payload is larger than the per-object limit
    #[error("Object of {size} bytes exceeds the object limit of {limit} bytes")]
    ObjectTooLarge { size: usize, limit: usize },

    /// Payload could never fit, even in an empty store
    #[error("Object of {size} bytes exceeds the cache capacity of {capacity} bytes")]
    ExceedsCapacity { size: usize, capacity: usize },

    /// The recency list ran out of entries before enough space was freed
    #[error("Eviction exhausted the cache: freed {freed} of {target} bytes")]
    EvictionExhausted { freed: usize, target: usize },
}

// == Proxy Error Enum ==
/// Connection-level errors. None of these are ever reported to the client;
/// they end the connection and are logged.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request or header line exceeded the line limit
    #[error("Line exceeds maximum length of {limit} bytes")]
    LineTooLong { limit: usize },

    /// Request line is not `<method> <uri> <version>`
    #[error("Malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Anything other than GET
    #[error("Method not supported: {0}")]
    UnsupportedMethod(String),

    /// Could not reach the origin server
    #[error("Failed to connect to origin {host}:{port}: {source}")]
    OriginConnect {
        host: String,
        port: String,
        #[source]
        source: std::io::Error,
    },

    /// Cache store rejected an operation
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
