//! Admin API Module
//!
//! Read-only HTTP surface for inspecting the proxy cache. Served on a
//! separate port and never involved in proxying.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /entries` - Cached keys, most recently used first

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
