//! Line-oriented socket reading

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{ProxyError, Result};

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LENGTH: usize = 8192;

/// Reads one line, including its `\n` terminator when present.
///
/// Returns `Ok(None)` at end of stream. A trailing unterminated fragment is
/// returned as-is; a line that reaches `limit` bytes without a terminator
/// is an error.
pub async fn read_line<R>(reader: &mut R, limit: usize) -> Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(limit as u64)
        .read_until(b'\n', &mut line)
        .await?;

    if n == 0 {
        return Ok(None);
    }
    if !line.ends_with(b"\n") && n >= limit {
        return Err(ProxyError::LineTooLong { limit });
    }
    Ok(Some(line))
}
