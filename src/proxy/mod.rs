//! Proxy Module
//!
//! The request forwarding pipeline: request-line validation, target parsing,
//! upstream header synthesis and streamed relaying with cache population.
//!
//! # Flow
//! - Cache hit: the cached bytes are written back verbatim
//! - Cache miss: the request is rewritten to HTTP/1.0 and forwarded; the
//!   reply is streamed to the client and cached when small enough

pub mod handler;
pub mod headers;
pub mod io;
pub mod relay;
pub mod request;
pub mod uri;

pub use handler::{CloseReason, ConnectionHandler};
pub use headers::{build_upstream_headers, USER_AGENT};
pub use relay::{relay, RelayOutcome};
pub use request::RequestLine;
pub use uri::{parse_target, Target};
