//! Upstream request header synthesis
//!
//! The proxy always talks HTTP/1.0 to the origin and owns the connection
//! management headers; every other client header passes through untouched.

use tokio::io::AsyncBufRead;

use crate::error::Result;
use crate::proxy::io::{read_line, MAX_LINE_LENGTH};
use crate::proxy::Target;

/// Fixed User-Agent sent to every origin.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:3.10.0) Gecko/20190801 Firefox/63.0.1";

/// Client header lines containing any of these substrings are dropped.
const REPLACED_HEADERS: [&str; 4] = ["Host", "User-Agent", "Connection", "Proxy-Connection"];

/// Builds the full upstream request head for `target`.
///
/// Consumes the client's remaining header lines up to the blank line (or end
/// of stream) and returns the block, blank line included.
pub async fn build_upstream_headers<R>(client: &mut R, target: &Target) -> Result<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let mut block = format!(
        "GET {} HTTP/1.0\r\n\
         Host: {}\r\n\
         User-Agent: {}\r\n\
         Connection: close\r\n\
         Proxy-Connection: close\r\n",
        target.path,
        target.host_header(),
        USER_AGENT
    )
    .into_bytes();

    while let Some(line) = read_line(client, MAX_LINE_LENGTH).await? {
        if line == b"\r\n" {
            break;
        }
        if is_replaced(&line) {
            continue;
        }
        block.extend_from_slice(&line);
    }

    block.extend_from_slice(b"\r\n");
    Ok(block)
}

/// Case-sensitive substring match anywhere in the line.
fn is_replaced(line: &[u8]) -> bool {
    REPLACED_HEADERS.iter().any(|name| {
        line.windows(name.len())
            .any(|window| window == name.as_bytes())
    })
}
