//! Link classification for the insert-link affordance.
//!
//! Hosts use this to decide how to render a link target (new tab vs.
//! in-app navigation) and to refuse script or malformed URLs outright.

use url::Url;

/// How a link target relates to the hosting page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    /// http(s) link to another host.
    External,
    /// http(s) link to the hosting page's own host.
    Internal,
    /// `javascript:` pseudo-URL; never rendered as a link.
    Script,
    /// Not parseable, empty host, or a non-http(s) scheme.
    Invalid,
}

/// Classify a link target relative to the hosting page's `host`
/// (hostname with optional port, as in `location.host`).
pub fn classify_link(href: &str, host: &str) -> LinkType {
    if href.to_lowercase().contains("javascript:") {
        return LinkType::Script;
    }

    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => return LinkType::Invalid,
    };

    if !matches!(url.scheme(), "http" | "https") {
        return LinkType::Invalid;
    }

    let hostname = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return LinkType::Invalid,
    };

    // Compare host:port the way `location.host` does: the port is elided
    // when it is the scheme default.
    let url_host = match url.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    };

    if url_host == host {
        LinkType::Internal
    } else {
        LinkType::External
    }
}

/// Validate a link entered in the insert-link form.
///
/// Returns `Err` with a displayable message for anything that is not a
/// well-formed http(s) URL with a host.
pub fn validate_link(href: &str) -> Result<(), &'static str> {
    const MESSAGE: &str = "Link is invalid";

    let url = Url::parse(href).map_err(|_| MESSAGE)?;

    if url.host_str().is_none_or(|h| h.is_empty()) || !matches!(url.scheme(), "http" | "https") {
        return Err(MESSAGE);
    }

    Ok(())
}
