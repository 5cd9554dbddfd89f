//! Origin fetch pipeline.
//!
//! ### Wire behaviour
//! - One fresh TCP connection per fetch, no pooling or keep-alive
//! - Request is `GET {path} HTTP/1.1` with a `Host` header only
//! - Response is read until the origin closes the connection; no
//!   Content-Length or chunked framing is interpreted
//!
//! ### Side effects on success
//! - Full raw response is written to the cache store
//! - If the header block contains `text/html`, the body is archived as a snapshot

pub mod url;

use bytes::{Bytes, BytesMut};
use std::io;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub use self::url::{Target, connect_authority, qualify, split_host_path};

use relaycache_core::{Archiver, CacheKey, CacheStore, Error, ProxyConfig};

/// Size of each read from the origin socket.
const READ_CHUNK: usize = 4096;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const HTML_MARKER: &[u8] = b"text/html";

/// Configuration for the origin fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Port used when the host carries none (default: 80)
    pub upstream_port: u16,

    /// Bound on connect plus the read loop (default: none)
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { upstream_port: 80, timeout: None }
    }
}

impl From<&ProxyConfig> for FetchConfig {
    fn from(config: &ProxyConfig) -> Self {
        Self { upstream_port: config.upstream_port, timeout: config.upstream_timeout() }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Raw response: status line, headers and body as received
    pub bytes: Bytes,
    /// Whether the header block mentioned `text/html`
    pub is_html: bool,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Fetches from origin servers and records what it fetched.
#[derive(Debug, Clone)]
pub struct OriginFetcher {
    config: FetchConfig,
    store: CacheStore,
    archiver: Archiver,
}

impl OriginFetcher {
    pub fn new(config: FetchConfig, store: CacheStore, archiver: Archiver) -> Self {
        Self { config, store, archiver }
    }

    /// Fetch `path` from `host`, cache the result under `key`, and archive HTML bodies.
    ///
    /// Any connect, DNS or I/O failure is returned as [`Error::Upstream`];
    /// an elapsed timeout as [`Error::UpstreamTimeout`].
    pub async fn fetch(&self, host: &str, path: &str, key: &CacheKey) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let exchange = self.exchange(host, path);
        let result = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| Error::UpstreamTimeout { host: host.to_string(), path: path.to_string() })?,
            None => exchange.await,
        };
        let bytes = result.map_err(|source| Error::Upstream { host: host.to_string(), path: path.to_string(), source })?;

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!("fetched {}{} in {}ms ({} bytes)", host, path, fetch_ms, bytes.len());

        self.store.store(key, &bytes).await;

        let (headers, body) = split_response(&bytes);
        let is_html = is_html(headers);
        if is_html {
            self.archiver.spawn_archive(body.to_vec(), host.to_string());
        }

        Ok(FetchResponse { bytes, is_html, fetch_ms })
    }

    /// The stream is dropped, and so closed, on every return path.
    async fn exchange(&self, host: &str, path: &str) -> io::Result<Bytes> {
        let (name, port) = connect_authority(host, self.config.upstream_port);
        let mut stream = TcpStream::connect((name, port)).await?;

        let request = format!("GET {path} HTTP/1.1\r\nHost: {host}\r\n\r\n");
        stream.write_all(request.as_bytes()).await?;

        let mut response = BytesMut::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
        }

        Ok(response.freeze())
    }
}

/// Split a raw response at the first blank line into header block and body.
///
/// Without a blank line the whole response is the header block and the body is empty.
pub fn split_response(raw: &[u8]) -> (&[u8], &[u8]) {
    match find(raw, HEADER_TERMINATOR) {
        Some(idx) => (&raw[..idx], &raw[idx + HEADER_TERMINATOR.len()..]),
        None => (raw, &[]),
    }
}

/// Case-sensitive substring check for `text/html` in a header block.
pub fn is_html(headers: &[u8]) -> bool {
    find(headers, HTML_MARKER).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
