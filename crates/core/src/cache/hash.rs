//! Content-addressed cache key generation.

use std::fmt;

use md5::{Digest, Md5};

/// Hex-encoded 128-bit digest of a fully-qualified request URL.
///
/// Doubles as the file name of the cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash the exact bytes of `url`; no normalization happens here.
    pub fn for_url(url: &str) -> Self {
        Self(compute_cache_key(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute the cache key for a qualified URL.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
