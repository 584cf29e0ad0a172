//! Cache Proxy - A concurrent forwarding HTTP proxy
//!
//! Forwards GET requests to origin servers and keeps small responses in a
//! byte-bounded in-memory LRU cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod server;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache};
pub use config::{Cli, Config};
pub use server::ProxyServer;
