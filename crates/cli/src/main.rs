//! relaycache-links: open URLs in the browser and keep an HTML index of them.
//!
//! Runs independently of the proxy and never reads its cache.

mod browser;
mod index;
mod input;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use browser::{Launcher, NoBrowser, SystemBrowser};
use input::Command;

const PROMPT: &str =
    "Enter URLs to open in new browser tabs (separated by spaces or commas, or type 'exit' to quit): ";

#[derive(Debug, Parser)]
#[command(name = "relaycache-links", about = "Open URLs and save them to an HTML index page")]
struct Cli {
    /// Where to write the index page.
    #[arg(long, default_value = "links_with_names.html")]
    output: PathBuf,

    /// Write the index without launching a browser.
    #[arg(long)]
    no_browser: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let launcher: Box<dyn Launcher> = if cli.no_browser { Box::new(NoBrowser) } else { Box::new(SystemBrowser) };

    let stdin = io::stdin();
    run_session(stdin.lock(), &mut io::stdout(), launcher.as_ref(), &cli.output)?;
    Ok(())
}

/// Prompt until `exit` or end of input, opening each batch and rewriting the index.
fn run_session<R: BufRead, W: Write>(mut input: R, out: &mut W, launcher: &dyn Launcher, output: &Path) -> io::Result<()> {
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let urls = match input::parse_line(&line) {
            Command::Exit => {
                writeln!(out, "Exiting the program.")?;
                return Ok(());
            }
            Command::Empty => {
                writeln!(out, "No valid URLs provided. Please try again.")?;
                continue;
            }
            Command::Open(urls) => urls,
        };

        for url in &urls {
            writeln!(out, "Opening URL: {url}")?;
            if let Err(err) = launcher.open(url) {
                tracing::warn!(url, error = %err, "failed to open URL");
                writeln!(out, "Error opening URL '{url}': {err}")?;
            }
        }

        if index::write_index(output, &urls)? {
            writeln!(out, "HTML file created: {}", output.display())?;
            if let Err(err) = launcher.open(&output.to_string_lossy()) {
                tracing::warn!(path = %output.display(), error = %err, "failed to open index page");
            }
        }
        writeln!(out, "URLs have been opened and saved to an HTML file.\n")?;
    }
}
