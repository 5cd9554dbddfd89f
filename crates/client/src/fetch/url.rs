//! Request-target qualification and host/path splitting.
//!
//! This is a deliberately minimal parser: query strings, fragments and
//! userinfo are not recognized and end up verbatim in the host or path.

use std::borrow::Cow;

const DEFAULT_SCHEME: &str = "http://";

/// A request target with its scheme filled in and split into host and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Scheme-qualified URL with at least a `/` path; the cache key is computed over these bytes.
    pub url: String,
    pub host: String,
    pub path: String,
}

impl Target {
    /// Qualify `raw` and split it.
    ///
    /// A host-only target gets a trailing `/` so that `example.com`,
    /// `http://example.com` and `http://example.com/` share one cache key.
    pub fn parse(raw: &str) -> Self {
        let mut url = qualify(raw).into_owned();
        if !url[scheme_len(&url)..].contains('/') {
            url.push('/');
        }
        let (host, path) = split_host_path(&url);
        Self { host: host.to_string(), path: path.to_string(), url }
    }
}

/// Prepend `http://` unless the target already starts with `http://` or `https://`.
pub fn qualify(target: &str) -> Cow<'_, str> {
    if target.starts_with("http://") || target.starts_with("https://") {
        Cow::Borrowed(target)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME}{target}"))
    }
}

/// Split a qualified URL into host and path.
///
/// The host is everything between the first `//` and the next `/`; the path
/// is the remainder starting at that `/`, or `/` when there is none.
pub fn split_host_path(url: &str) -> (&str, &str) {
    let after_scheme = url.split_once("//").map_or(url, |(_, rest)| rest);
    match after_scheme.find('/') {
        Some(idx) => (&after_scheme[..idx], &after_scheme[idx..]),
        None => (after_scheme, "/"),
    }
}

fn scheme_len(url: &str) -> usize {
    url.find("//").map_or(0, |idx| idx + 2)
}

/// Host name and port to connect to for `host`.
///
/// An explicit `:port` suffix wins; otherwise `default_port` is used.
/// Bracketed IPv6 literals have their brackets removed.
pub fn connect_authority(host: &str, default_port: u16) -> (&str, u16) {
    if let Some(rest) = host.strip_prefix('[')
        && let Some((addr, tail)) = rest.split_once(']')
    {
        let port = tail.strip_prefix(':').and_then(|p| p.parse().ok()).unwrap_or(default_port);
        return (addr, port);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') => match port.parse() {
            Ok(port) => (name, port),
            Err(_) => (host, default_port),
        },
        _ => (host, default_port),
    }
}
