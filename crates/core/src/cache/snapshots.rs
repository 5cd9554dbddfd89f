//! HTML snapshot archiving.
//!
//! Snapshots are write-once copies of HTML response bodies named
//! `{host}_{YYYYMMDD_HHMMSS}.html`. Two captures of one host in the same
//! second share a name and the later one wins.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tokio::fs;
use tokio::task::JoinHandle;

use crate::Error;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A snapshot written to disk.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub host: String,
    pub captured_at: DateTime<Local>,
    pub path: PathBuf,
}

/// Best-effort writer of HTML snapshots into the cache directory.
#[derive(Clone, Debug)]
pub struct Archiver {
    root: PathBuf,
}

impl Archiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File name for a snapshot of `host` captured at `at`.
    pub fn snapshot_name(host: &str, at: &DateTime<Local>) -> String {
        format!("{host}_{}.html", at.format(TIMESTAMP_FORMAT))
    }

    /// Write `body` as a snapshot of `host`.
    ///
    /// Returns `None` when the write failed; the failure is logged.
    pub async fn archive(&self, body: &[u8], host: &str) -> Option<Snapshot> {
        match self.try_archive(body, host).await {
            Ok(snapshot) => {
                tracing::info!(host, path = %snapshot.path.display(), "saved HTML snapshot");
                Some(snapshot)
            }
            Err(err) => {
                tracing::warn!(host, error = %err, "failed to save HTML snapshot");
                None
            }
        }
    }

    /// Archive on a detached task so the caller never waits on the write.
    pub fn spawn_archive(&self, body: Vec<u8>, host: String) -> JoinHandle<Option<Snapshot>> {
        let archiver = self.clone();
        tokio::spawn(async move { archiver.archive(&body, &host).await })
    }

    async fn try_archive(&self, body: &[u8], host: &str) -> Result<Snapshot, Error> {
        let captured_at = Local::now();
        let path = self.root.join(Self::snapshot_name(host, &captured_at));
        fs::write(&path, body).await?;
        Ok(Snapshot { host: host.to_string(), captured_at, path })
    }
}
