//! Request target decomposition
//!
//! Splits an absolute or bare request URI into origin host, port and path.

/// Port assumed when the URI names none.
pub const DEFAULT_PORT: &str = "80";

/// Where a request should be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: String,
    pub path: String,
}

impl Target {
    /// Value for the upstream `Host` header; the port is only spelled out
    /// when it differs from 80.
    pub fn host_header(&self) -> String {
        if self.port == DEFAULT_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Parses `[scheme://]host[:port][/path]`.
///
/// The scheme token itself is not validated; everything up to and including
/// the first `//` is skipped. The input is only borrowed.
pub fn parse_target(uri: &str) -> Target {
    let rest = match uri.find("//") {
        Some(idx) => &uri[idx + 2..],
        None => uri,
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };

    let (host, port) = match authority.find(':') {
        Some(idx) => (&authority[..idx], &authority[idx + 1..]),
        None => (authority, DEFAULT_PORT),
    };

    Target {
        host: host.to_string(),
        port: port.to_string(),
        path: path.to_string(),
    }
}
