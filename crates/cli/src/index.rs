//! HTML link index generation.

use std::fs;
use std::io;
use std::path::Path;

use url::Url;

/// One entry of the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Display name: the URL's host (with port), or `Unknown`.
    pub name: String,
    pub href: String,
}

impl Link {
    pub fn from_url(href: &str) -> Self {
        let name = Url::parse(href)
            .ok()
            .and_then(|url| {
                url.host_str().map(|host| match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                })
            })
            .unwrap_or_else(|| "Unknown".to_string());
        Self { name, href: href.to_string() }
    }
}

/// Render the index page for `links`.
pub fn render_index(links: &[Link]) -> String {
    let mut html = String::from("<html>\n<head><title>Clickable Links</title></head>\n<body>\n");
    html.push_str("<h1>Click on the links below:</h1>\n");
    for link in links {
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\">{}</a><br>\n",
            escape(&link.href),
            escape(&link.name)
        ));
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Write the index page for `urls` to `path`.
///
/// Returns `false` without touching the filesystem when `urls` is empty.
pub fn write_index(path: &Path, urls: &[String]) -> io::Result<bool> {
    if urls.is_empty() {
        return Ok(false);
    }
    let links: Vec<Link> = urls.iter().map(|url| Link::from_url(url)).collect();
    fs::write(path, render_index(&links))?;
    Ok(true)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}
