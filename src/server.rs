//! Proxy accept loop
//!
//! One independent task per accepted connection, no admission limit.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::cache::SharedCache;
use crate::proxy::ConnectionHandler;

// == Proxy Server ==
/// Listening socket plus the cache shared by every connection.
pub struct ProxyServer {
    listener: TcpListener,
    cache: SharedCache,
}

impl ProxyServer {
    /// Binds the proxy listener.
    pub async fn bind<A: ToSocketAddrs>(addr: A, cache: SharedCache) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "Proxy listener bound");
        Ok(Self { listener, cache })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever.
    ///
    /// Each connection is handed to a detached task and the loop moves on to
    /// the next accept immediately. Accept errors are logged and skipped.
    pub async fn run(&self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!(error = %err, "Accept failed");
                    continue;
                }
            };

            let cache = Arc::clone(&self.cache);
            let span = info_span!("connection", peer = %peer);
            tokio::spawn(
                async move {
                    let reason = ConnectionHandler::new(stream, cache).run().await;
                    debug!(?reason, "Connection closed");
                }
                .instrument(span),
            );
        }
    }
}
