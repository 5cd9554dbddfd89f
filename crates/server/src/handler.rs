//! Per-connection request handling.
//!
//! One handler invocation reads a single request, answers it from the cache
//! or the origin, and closes the connection. Failures never leave the
//! connection that caused them.

use std::net::SocketAddr;

use relaycache_client::OriginFetcher;
use relaycache_core::{CacheKey, CacheStore, Error, Lookup, ProxyConfig};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::BAD_GATEWAY;
use crate::request::{ParsedRequest, request_line};

/// Serves one request per connection.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    store: CacheStore,
    fetcher: OriginFetcher,
    read_chunk: usize,
}

impl RequestHandler {
    pub fn new(config: &ProxyConfig, store: CacheStore, fetcher: OriginFetcher) -> Self {
        Self { store, fetcher, read_chunk: config.read_chunk }
    }

    /// Handle the connection to completion, then close it.
    pub async fn handle<S>(&self, mut stream: S, peer: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if let Err(err) = self.serve(&mut stream, peer).await {
            warn!(peer = %peer, error = %err, "error handling client");
        }
        if let Err(err) = stream.shutdown().await {
            debug!(peer = %peer, error = %err, "failed to shut down client stream");
        }
    }

    async fn serve<S>(&self, stream: &mut S, peer: SocketAddr) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // A single bounded read; the request line must arrive in it.
        let mut buf = vec![0u8; self.read_chunk];
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        let raw = &buf[..n];
        info!(peer = %peer, "Request received: {}", request_line(raw));

        let request = match ParsedRequest::parse(raw) {
            Ok(request) => request,
            Err(err) => {
                debug!(peer = %peer, error = %err, "rejecting request");
                stream.write_all(err.status_line()).await?;
                return Ok(());
            }
        };

        let key = CacheKey::for_url(&request.url);

        if let Lookup::Hit(bytes) = self.store.lookup(&key).await {
            stream.write_all(&bytes).await?;
            info!(peer = %peer, key = %key, "Served from cache: {}", request.url);
            return Ok(());
        }

        match self.fetcher.fetch(&request.host, &request.path, &key).await {
            Ok(response) => {
                stream.write_all(&response.bytes).await?;
                info!(
                    peer = %peer,
                    key = %key,
                    fetch_ms = response.fetch_ms,
                    html = response.is_html,
                    "Fetched from server and cached: {}{}",
                    request.host,
                    request.path
                );
            }
            Err(err) => {
                warn!(host = %request.host, path = %request.path, error = %err, "Error fetching from server");
                stream.write_all(BAD_GATEWAY).await?;
            }
        }

        Ok(())
    }
}
