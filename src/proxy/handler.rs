//! Per-connection state machine
//!
//! `AwaitingRequestLine -> Validating -> {ServingFromCache | Forwarding} -> Closed`
//!
//! Every failure ends in `Closed` without writing anything to the client.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::error::ProxyError;
use crate::proxy::headers::build_upstream_headers;
use crate::proxy::io::{read_line, MAX_LINE_LENGTH};
use crate::proxy::relay::{is_disconnect, relay, RelayOutcome};
use crate::proxy::request::RequestLine;
use crate::proxy::uri::{parse_target, Target};

/// Why a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// No request line could be read
    NoRequest,
    /// Request line was not `<method> <uri> <version>`
    MalformedRequest,
    /// Method other than GET
    UnsupportedMethod,
    /// Answered from the cache
    ServedFromCache { bytes: usize },
    /// Answered by the origin
    Forwarded(RelayOutcome),
    /// Origin connection could not be opened
    OriginUnreachable,
    /// I/O failure on either side
    Failed,
}

/// Connection states; each carries what the next step needs.
#[derive(Debug)]
enum ConnectionState {
    AwaitingRequestLine,
    Validating(Vec<u8>),
    ServingFromCache(Vec<u8>),
    Forwarding(RequestLine),
    Closed(CloseReason),
}

// == Connection Handler ==
/// Drives one client connection to completion.
pub struct ConnectionHandler<S> {
    client: BufReader<S>,
    cache: SharedCache,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, cache: SharedCache) -> Self {
        Self {
            client: BufReader::new(stream),
            cache,
        }
    }

    /// Runs the state machine until `Closed`, then shuts the client down.
    pub async fn run(mut self) -> CloseReason {
        let mut state = ConnectionState::AwaitingRequestLine;

        loop {
            state = match state {
                ConnectionState::AwaitingRequestLine => self.await_request_line().await,
                ConnectionState::Validating(line) => self.validate(&line).await,
                ConnectionState::ServingFromCache(payload) => {
                    self.serve_from_cache(&payload).await
                }
                ConnectionState::Forwarding(request) => self.forward(request).await,
                ConnectionState::Closed(reason) => {
                    if let Err(err) = self.client.shutdown().await {
                        debug!(error = %err, "Client shutdown failed");
                    }
                    return reason;
                }
            };
        }
    }

    async fn await_request_line(&mut self) -> ConnectionState {
        match read_line(&mut self.client, MAX_LINE_LENGTH).await {
            Ok(Some(line)) => ConnectionState::Validating(line),
            Ok(None) => ConnectionState::Closed(CloseReason::NoRequest),
            Err(err) => {
                debug!(error = %err, "Failed to read request line");
                ConnectionState::Closed(CloseReason::NoRequest)
            }
        }
    }

    async fn validate(&mut self, line: &[u8]) -> ConnectionState {
        let request = match RequestLine::parse(line).and_then(RequestLine::ensure_supported) {
            Ok(request) => request,
            Err(ProxyError::UnsupportedMethod(method)) => {
                info!(method = %method, "Method not supported");
                return ConnectionState::Closed(CloseReason::UnsupportedMethod);
            }
            Err(err) => {
                info!(error = %err, "Rejected request");
                return ConnectionState::Closed(CloseReason::MalformedRequest);
            }
        };

        let hit = {
            let mut store = self.cache.lock().await;
            store.lookup(&request.uri).map(<[u8]>::to_vec)
        };

        match hit {
            Some(payload) => {
                debug!(uri = %request.uri, size = payload.len(), "Cache hit");
                ConnectionState::ServingFromCache(payload)
            }
            None => {
                debug!(uri = %request.uri, "Cache miss");
                ConnectionState::Forwarding(request)
            }
        }
    }

    async fn serve_from_cache(&mut self, payload: &[u8]) -> ConnectionState {
        let written = match self.client.write_all(payload).await {
            Ok(()) => self.client.flush().await,
            Err(err) => Err(err),
        };

        match written {
            Ok(()) => {}
            Err(err) if is_disconnect(&err) => {
                debug!(error = %err, "Client disconnected while serving from cache");
            }
            Err(err) => {
                warn!(error = %err, "Failed to serve cached response");
                return ConnectionState::Closed(CloseReason::Failed);
            }
        }

        ConnectionState::Closed(CloseReason::ServedFromCache {
            bytes: payload.len(),
        })
    }

    async fn forward(&mut self, request: RequestLine) -> ConnectionState {
        let target = parse_target(&request.uri);

        let header_block = match build_upstream_headers(&mut self.client, &target).await {
            Ok(block) => block,
            Err(err) => {
                debug!(error = %err, "Failed to read client headers");
                return ConnectionState::Closed(CloseReason::Failed);
            }
        };

        let mut upstream = match connect_origin(&target).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "Origin unreachable");
                return ConnectionState::Closed(CloseReason::OriginUnreachable);
            }
        };

        match relay(
            &mut self.client,
            &mut upstream,
            &header_block,
            &self.cache,
            &request.uri,
        )
        .await
        {
            Ok(outcome) => {
                info!(
                    uri = %request.uri,
                    bytes = outcome.bytes_relayed,
                    cached = outcome.cached,
                    "Forwarded request"
                );
                ConnectionState::Closed(CloseReason::Forwarded(outcome))
            }
            Err(err) => {
                warn!(uri = %request.uri, error = %err, "Relay failed");
                ConnectionState::Closed(CloseReason::Failed)
            }
        }
    }
}

/// Opens a TCP connection to the origin named by `target`.
async fn connect_origin(target: &Target) -> Result<TcpStream, ProxyError> {
    TcpStream::connect(format!("{}:{}", target.host, target.port))
        .await
        .map_err(|source| ProxyError::OriginConnect {
            host: target.host.clone(),
            port: target.port.clone(),
            source,
        })
}
