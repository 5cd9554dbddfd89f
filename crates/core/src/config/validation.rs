//! Configuration validation rules.
//!
//! This module provides validation logic for `ProxyConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::ProxyConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl ProxyConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `backlog` is below 10
    /// - `read_chunk` is 0 or exceeds 64KB
    /// - `upstream_port` is 0
    /// - `upstream_timeout_ms` is set but below 100ms or above 5 minutes
    /// - `cache_dir` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backlog < 10 {
            return Err(ConfigError::Invalid { field: "backlog".into(), reason: "must be at least 10".into() });
        }

        if self.read_chunk == 0 {
            return Err(ConfigError::Invalid { field: "read_chunk".into(), reason: "must be greater than 0".into() });
        }
        if self.read_chunk > 64 * 1024 {
            return Err(ConfigError::Invalid { field: "read_chunk".into(), reason: "must not exceed 64KB".into() });
        }

        if self.upstream_port == 0 {
            return Err(ConfigError::Invalid { field: "upstream_port".into(), reason: "must not be 0".into() });
        }

        if self.upstream_timeout_ms != 0 && self.upstream_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "upstream_timeout_ms".into(),
                reason: "must be 0 (disabled) or at least 100ms".into(),
            });
        }
        if self.upstream_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "upstream_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_dir".into(), reason: "must not be empty".into() });
        }

        if self.port != 0 && self.port == self.upstream_port {
            tracing::warn!(
                port = self.port,
                "listen port equals upstream port; requests to this host will loop back into the proxy"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = ProxyConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_backlog_too_small() {
        let config = ProxyConfig { backlog: 9, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "backlog"));
    }

    #[test]
    fn test_validate_read_chunk_zero() {
        let config = ProxyConfig { read_chunk: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "read_chunk"));
    }

    #[test]
    fn test_validate_read_chunk_exceeds_limit() {
        let config = ProxyConfig { read_chunk: 64 * 1024 + 1, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "read_chunk"));
    }

    #[test]
    fn test_validate_upstream_port_zero() {
        let config = ProxyConfig { upstream_port: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "upstream_port"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = ProxyConfig { upstream_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "upstream_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = ProxyConfig { upstream_timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "upstream_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_cache_dir() {
        let config = ProxyConfig { cache_dir: PathBuf::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_dir"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = ProxyConfig { backlog: 10, read_chunk: 1, upstream_timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
