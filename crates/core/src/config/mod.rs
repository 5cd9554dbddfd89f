//! Proxy configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Command-line listen port (if given)
//! 2. Environment variables (RELAYCACHE_*)
//! 3. TOML config file (if RELAYCACHE_CONFIG_FILE set)
//! 4. Built-in defaults

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Proxy configuration handed to each component at construction.
///
/// Loading precedence (highest wins):
/// 1. Listen port from the command line
/// 2. Environment variables (RELAYCACHE_*)
/// 3. TOML config file (if RELAYCACHE_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// TCP port to listen on, on all interfaces.
    ///
    /// Set via the first command-line argument or RELAYCACHE_PORT.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding cache artifacts and HTML snapshots.
    ///
    /// Set via RELAYCACHE_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Append-only text log file.
    ///
    /// Set via RELAYCACHE_LOG_PATH environment variable.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Listen backlog for the accepting socket.
    #[serde(default = "default_backlog")]
    pub backlog: u32,

    /// Maximum bytes read from a client in its single request read.
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,

    /// Origin port used when the request host carries none.
    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Bound on origin connect and read in milliseconds; 0 disables it.
    ///
    /// Set via RELAYCACHE_UPSTREAM_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub upstream_timeout_ms: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("log.txt")
}

fn default_backlog() -> u32 {
    10
}

fn default_read_chunk() -> usize {
    1024
}

fn default_upstream_port() -> u16 {
    80
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cache_dir: default_cache_dir(),
            log_path: default_log_path(),
            backlog: default_backlog(),
            read_chunk: default_read_chunk(),
            upstream_port: default_upstream_port(),
            upstream_timeout_ms: 0,
        }
    }
}

impl ProxyConfig {
    /// Address the acceptor binds to: every interface on `port`.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Upstream timeout as Duration, or `None` when disabled.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        (self.upstream_timeout_ms > 0).then(|| Duration::from_millis(self.upstream_timeout_ms))
    }

    /// Load configuration from all sources with layered precedence, then validate it.
    ///
    /// `port` is the command-line override and wins over every other source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load(port: Option<u16>) -> Result<Self, ConfigError> {
        let config = Self::extract(port)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge every source like [`ProxyConfig::load`] but skip validation.
    ///
    /// The binary uses this to learn `log_path` before anything is checked,
    /// so validation failures land in the log file.
    pub fn extract(port: Option<u16>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RELAYCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RELAYCACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        if let Some(port) = port {
            figment = figment.merge(Serialized::default("port", port));
        }

        figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.log_path, PathBuf::from("log.txt"));
        assert_eq!(config.backlog, 10);
        assert_eq!(config.read_chunk, 1024);
        assert_eq!(config.upstream_port, 80);
        assert_eq!(config.upstream_timeout_ms, 0);
    }

    #[test]
    fn test_listen_addr_all_interfaces() {
        let config = ProxyConfig { port: 9090, ..Default::default() };
        assert_eq!(config.listen_addr(), "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_upstream_timeout_disabled_by_default() {
        let config = ProxyConfig::default();
        assert!(config.upstream_timeout().is_none());
    }

    #[test]
    fn test_upstream_timeout_duration() {
        let config = ProxyConfig { upstream_timeout_ms: 2_500, ..Default::default() };
        assert_eq!(config.upstream_timeout(), Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn test_load_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("relaycache.toml", "cache_dir = \"/tmp/from-file\"\nport = 7000\nbacklog = 32")?;
            jail.set_env("RELAYCACHE_CONFIG_FILE", "relaycache.toml");
            jail.set_env("RELAYCACHE_PORT", "7100");

            let config = ProxyConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.cache_dir, PathBuf::from("/tmp/from-file"));
            assert_eq!(config.backlog, 32);
            assert_eq!(config.port, 7100);

            let config = ProxyConfig::load(Some(7200)).map_err(|e| e.to_string())?;
            assert_eq!(config.port, 7200);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RELAYCACHE_BACKLOG", "2");
            let result = ProxyConfig::load(None);
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "backlog"));
            Ok(())
        });
    }

    #[test]
    fn test_extract_defers_validation() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RELAYCACHE_BACKLOG", "2");
            jail.set_env("RELAYCACHE_LOG_PATH", "proxy.log");

            let config = ProxyConfig::extract(None).map_err(|e| e.to_string())?;
            assert_eq!(config.backlog, 2);
            assert_eq!(config.log_path, PathBuf::from("proxy.log"));
            assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "backlog"));
            Ok(())
        });
    }

    #[test]
    fn test_extract_reports_unparseable_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RELAYCACHE_BACKLOG", "many");
            let result = ProxyConfig::extract(None);
            assert!(matches!(result, Err(ConfigError::LoadFailed(_))));
            Ok(())
        });
    }
}
