//! Tracing setup: human-readable output on stderr plus an append-only text log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Plain-text layer writing one line per event to the log file.
type FileLayer<S> = fmt::Layer<S, DefaultFields, Format, Mutex<File>>;

/// Install the global subscriber.
///
/// Each event is also appended to `log_path` as one timestamped line. If the
/// file cannot be opened, logging continues on stderr only.
pub fn init_logger(log_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false).compact();

    let (file_layer, open_error) = match file_layer(log_path) {
        Ok(layer) => (Some(layer), None),
        Err(err) => (None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    if let Some(err) = open_error {
        tracing::warn!(path = %log_path.display(), error = %err, "could not open log file; logging to stderr only");
    }

    Ok(())
}

/// Open `log_path` for appending and wrap it in a fmt layer without ANSI colors.
fn file_layer<S>(log_path: &Path) -> io::Result<FileLayer<S>> {
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    Ok(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(false))
}
