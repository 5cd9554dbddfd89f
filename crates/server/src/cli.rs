use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "relaycache", about = "Caching forward HTTP proxy")]
pub struct Cli {
    /// Port to listen on (defaults to 8080, or RELAYCACHE_PORT if set).
    pub port: Option<u16>,
}
