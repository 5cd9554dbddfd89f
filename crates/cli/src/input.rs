//! Parsing of the interactive URL prompt.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ ,;]+").expect("invalid separator pattern"));

/// What the user asked for on one prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Nothing usable was entered.
    Empty,
    /// Scheme-qualified URLs, in the order given.
    Open(Vec<String>),
}

/// Interpret one line of user input.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") {
        return Command::Exit;
    }

    let urls: Vec<String> = SEPARATORS
        .split(line)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(qualify)
        .collect();

    if urls.is_empty() { Command::Empty } else { Command::Open(urls) }
}

/// Prepend `http://` unless an http(s) scheme is already present.
pub fn qualify(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
