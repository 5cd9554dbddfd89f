//! Cache artifact lookup and storage.
//!
//! Artifacts are raw HTTP responses stored verbatim in `<root>/<key>`.
//! Read failures other than "not found" are logged and reported as a miss
//! so the caller falls through to the origin.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use super::hash::CacheKey;
use crate::Error;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of looking up a key in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Stored response bytes, exactly as captured from the origin.
    Hit(Vec<u8>),
    Miss,
}

/// Handle on the cache directory.
#[derive(Clone, Debug)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open the cache rooted at `root`, creating the directory if it doesn't exist.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Path of the artifact for `key`.
    pub fn artifact_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Read the artifact for `key`.
    ///
    /// Never fails: an unreadable artifact is logged and treated as absent.
    pub async fn lookup(&self, key: &CacheKey) -> Lookup {
        let path = self.artifact_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Lookup::Hit(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Lookup::Miss,
            Err(err) => {
                tracing::warn!(key = %key, path = %path.display(), error = %err, "cache read failed, treating as miss");
                Lookup::Miss
            }
        }
    }

    /// Write (or overwrite) the artifact for `key`.
    ///
    /// Failures are logged and swallowed so the client response is unaffected.
    pub async fn store(&self, key: &CacheKey, bytes: &[u8]) {
        if let Err(err) = self.try_store(key, bytes).await {
            tracing::warn!(key = %key, error = %err, "cache write failed");
        }
    }

    /// Write-then-rename so concurrent readers never see a partial artifact.
    async fn try_store(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), Error> {
        let final_path = self.artifact_path(key);
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_path = self.root.join(format!(".{key}.{}.{seq}.tmp", std::process::id()));

        if let Err(err) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        tracing::trace!(key = %key, bytes = bytes.len(), "cache artifact written");
        Ok(())
    }
}
