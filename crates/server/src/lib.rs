//! relaycache proxy server.
//!
//! Wires the cache store, archiver and origin fetcher from `relaycache-core`
//! and `relaycache-client` into a request handler behind a TCP acceptor.

pub mod acceptor;
pub mod cli;
pub mod error;
pub mod handler;
pub mod logging;
pub mod request;

use relaycache_client::{FetchConfig, OriginFetcher};
use relaycache_core::{Archiver, CacheStore, Error, ProxyConfig};

pub use acceptor::Acceptor;
pub use handler::RequestHandler;
pub use request::ParsedRequest;

/// Create the cache directory, assemble the components and bind the listener.
///
/// Every failure here is a setup failure.
pub async fn build(config: &ProxyConfig) -> Result<Acceptor, Error> {
    let store = CacheStore::open(&config.cache_dir).await?;
    let archiver = Archiver::new(&config.cache_dir);
    let fetcher = OriginFetcher::new(FetchConfig::from(config), store.clone(), archiver);
    let handler = RequestHandler::new(config, store, fetcher);
    Acceptor::bind(config, handler)
}
