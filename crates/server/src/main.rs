//! relaycache entry point.
//!
//! Loads configuration, installs logging, and runs the proxy until interrupted.

use anyhow::Result;
use clap::Parser;

use relaycache_core::ProxyConfig;
use relaycache_server::{build, cli::Cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match ProxyConfig::extract(cli.port) {
        Ok(config) => config,
        Err(err) => {
            logging::init_logger(&ProxyConfig::default().log_path)?;
            tracing::error!(error = %err, "Error loading configuration");
            return Err(err.into());
        }
    };
    logging::init_logger(&config.log_path)?;

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "Error initializing server");
        return Err(err.into());
    }

    let acceptor = match build(&config).await {
        Ok(acceptor) => acceptor,
        Err(err) => {
            tracing::error!(error = %err, "Error initializing server");
            return Err(err.into());
        }
    };
    tracing::info!(port = config.port, cache_dir = %config.cache_dir.display(), "Proxy server started");

    tokio::select! {
        _ = acceptor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
