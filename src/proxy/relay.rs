//! Streaming response relay
//!
//! Sends the synthesized request upstream, then streams the origin's reply to
//! the client chunk by chunk while collecting a cacheable copy.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::cache::{InsertOutcome, SharedCache, MAX_OBJECT_SIZE};
use crate::error::Result;

/// Bytes requested from the origin per read.
pub const RELAY_CHUNK_SIZE: usize = 8192;

/// Summary of one relayed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Bytes received from the origin
    pub bytes_relayed: usize,
    /// Whether this response was added to the cache
    pub cached: bool,
    /// The client went away before the origin finished
    pub client_disconnected: bool,
}

/// True for write failures caused by the peer closing its end.
pub fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
    )
}

/// Relays one request/response exchange and caches an eligible response
/// under `cache_key`.
///
/// Bytes past `MAX_OBJECT_SIZE` are still forwarded but no longer buffered;
/// such responses are never cached. A client disconnect ends the exchange
/// early without caching and is not an error.
pub async fn relay<C, U>(
    client: &mut C,
    upstream: &mut U,
    header_block: &[u8],
    cache: &SharedCache,
    cache_key: &str,
) -> Result<RelayOutcome>
where
    C: AsyncWrite + Unpin,
    U: AsyncRead + AsyncWrite + Unpin,
{
    upstream.write_all(header_block).await?;
    upstream.flush().await?;

    let mut chunk = vec![0u8; RELAY_CHUNK_SIZE];
    let mut object = Vec::new();
    let mut total = 0usize;

    loop {
        let n = upstream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        if total + n <= MAX_OBJECT_SIZE {
            object.extend_from_slice(&chunk[..n]);
        }
        total += n;

        if let Err(err) = client.write_all(&chunk[..n]).await {
            return client_write_failed(err, total);
        }
    }

    if let Err(err) = client.flush().await {
        return client_write_failed(err, total);
    }

    if total > MAX_OBJECT_SIZE {
        debug!(key = %cache_key, size = total, "Response too large to cache");
        return Ok(RelayOutcome {
            bytes_relayed: total,
            cached: false,
            client_disconnected: false,
        });
    }

    let inserted = {
        let mut store = cache.lock().await;
        store.insert(cache_key, object)
    };
    let cached = match inserted {
        Ok(InsertOutcome::Inserted { evicted_bytes }) => {
            debug!(key = %cache_key, size = total, evicted_bytes, "Cached response");
            true
        }
        Ok(InsertOutcome::AlreadyCached) => false,
        Err(err) => {
            warn!(key = %cache_key, error = %err, "Response not cached");
            false
        }
    };

    Ok(RelayOutcome {
        bytes_relayed: total,
        cached,
        client_disconnected: false,
    })
}

fn client_write_failed(err: io::Error, total: usize) -> Result<RelayOutcome> {
    if is_disconnect(&err) {
        debug!(bytes_relayed = total, "Client disconnected during relay");
        Ok(RelayOutcome {
            bytes_relayed: total,
            cached: false,
            client_disconnected: true,
        })
    } else {
        Err(err.into())
    }
}
