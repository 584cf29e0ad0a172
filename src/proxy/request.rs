//! Request line parsing
//!
//! Splits `<method> <uri> <version>` and enforces the GET-only policy.

use crate::error::{ProxyError, Result};

/// The only method the proxy forwards.
pub const SUPPORTED_METHOD: &str = "GET";

/// A parsed client request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub version: String,
}

impl RequestLine {
    /// Parses a raw request line into exactly three tokens separated by
    /// ASCII whitespace.
    ///
    /// Tokens are kept byte-for-byte; a line that is not valid UTF-8 is
    /// malformed, since the URI doubles as the exact cache key.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let mut tokens = line
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty());

        match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(uri), Some(version), None) => Ok(Self {
                method: token(method, line)?,
                uri: token(uri, line)?,
                version: token(version, line)?,
            }),
            _ => Err(malformed(line)),
        }
    }

    /// Rejects every method except GET (compared case-insensitively).
    pub fn ensure_supported(self) -> Result<Self> {
        if self.method.eq_ignore_ascii_case(SUPPORTED_METHOD) {
            Ok(self)
        } else {
            Err(ProxyError::UnsupportedMethod(self.method))
        }
    }
}

fn token(bytes: &[u8], line: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| malformed(line))
}

fn malformed(line: &[u8]) -> ProxyError {
    ProxyError::MalformedRequestLine(String::from_utf8_lossy(line).trim_end().to_string())
}
