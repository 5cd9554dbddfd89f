//! Origin-side code for relaycache.
//!
//! This crate provides the upstream fetch pipeline and request-target
//! handling shared by the proxy server.

pub mod fetch;

pub use fetch::{FetchConfig, FetchResponse, OriginFetcher, Target};
