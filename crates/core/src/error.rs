//! Unified error types for relaycache.
//!
//! Display strings carry a stable uppercase code prefix so log lines can be grepped by class.

use std::io;
use std::net::SocketAddr;

use crate::config::ConfigError;

/// Unified error types for the relaycache proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connecting to or reading from the origin failed.
    #[error("UPSTREAM_ERROR: {host}{path}: {source}")]
    Upstream {
        host: String,
        path: String,
        #[source]
        source: io::Error,
    },

    /// The origin did not answer within the configured timeout.
    #[error("UPSTREAM_TIMEOUT: {host}{path}")]
    UpstreamTimeout { host: String, path: String },

    /// The listening socket could not be set up.
    #[error("BIND_FAILED: {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// Local filesystem or socket failure.
    #[error("IO_ERROR: {0}")]
    Io(#[from] io::Error),
}
