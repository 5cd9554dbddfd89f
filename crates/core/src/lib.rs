//! Core types and shared functionality for relaycache.
//!
//! This crate provides:
//! - Filesystem cache store and HTML snapshot archiver
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Archiver, CacheKey, CacheStore, Lookup};
pub use config::{ConfigError, ProxyConfig};
pub use error::Error;
