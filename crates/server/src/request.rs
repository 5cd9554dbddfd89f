//! Minimal request-line parsing.
//!
//! Only the first line of the first read is examined. Headers are ignored;
//! the origin host comes from the request target itself.

use relaycache_client::Target;

use crate::error::RequestError;

/// A client request, owned by the handler serving its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    /// Target exactly as the client sent it.
    pub target: String,
    /// Target with its scheme filled in; the cache key input.
    pub url: String,
    pub host: String,
    pub path: String,
}

impl ParsedRequest {
    /// Parse the request line out of a raw client read.
    pub fn parse(raw: &[u8]) -> Result<Self, RequestError> {
        let text = String::from_utf8_lossy(raw);
        let line = first_line(&text);

        if !line.starts_with("GET") {
            return Err(RequestError::NotGet(line.to_string()));
        }

        let mut tokens = line.split_whitespace();
        let method = tokens.next().unwrap_or_default().to_string();
        let target = tokens
            .next()
            .ok_or_else(|| RequestError::MissingTarget(line.to_string()))?
            .to_string();

        let Target { url, host, path } = Target::parse(&target);
        Ok(Self { method, target, url, host, path })
    }
}

/// First line of a raw request, lossily decoded, for logging.
pub fn request_line(raw: &[u8]) -> String {
    first_line(&String::from_utf8_lossy(raw)).to_string()
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
