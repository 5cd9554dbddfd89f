//! Filesystem-backed cache for raw origin responses and HTML snapshots.
//!
//! There is no in-memory index: every lookup reads straight from the cache
//! directory. It supports:
//!
//! - Content-addressed artifacts keyed by the MD5 of the request URL
//! - Whole-file overwrite via write-then-rename
//! - Timestamped HTML snapshots named by origin host

pub mod hash;
pub mod snapshots;
pub mod store;

pub use crate::Error;

pub use hash::CacheKey;
pub use snapshots::{Archiver, Snapshot};
pub use store::{CacheStore, Lookup};
