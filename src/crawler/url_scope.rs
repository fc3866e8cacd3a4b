use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum ScopeError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("target URL '{0}' has no host")]
    MissingHost(String),
}

// ============================================================================
// URL utilities
// ============================================================================

/// Prefix `https://` when the user typed a bare host.
pub fn with_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Canonical key for the visit set: scheme, host, path and query; no fragment.
pub fn normalize(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

/// Host plus explicit port, e.g. `example.com` or `localhost:8080`.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    authority(&parsed)
}

/// Origin prefix `scheme://host[:port]` used to shorten page labels.
pub fn base_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let authority = authority(&parsed)?;
    Some(format!("{}://{}", parsed.scheme(), authority))
}

/// Page label relative to the run's base origin; `/` for the root.
pub fn page_key(url: &str, base: &str) -> String {
    let stripped = if base.is_empty() {
        url.to_string()
    } else {
        url.replace(base, "")
    };
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped
    }
}

/// Resolve an `href` against the page it was found on.
///
/// Returns the normalized absolute URL, or `None` for unparseable or
/// non-HTTP links (`mailto:`, `javascript:` ...).
pub fn resolve_link(page_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    let mut joined = base.join(href.trim()).ok()?;
    if !matches!(joined.scheme(), "http" | "https") {
        return None;
    }
    joined.set_fragment(None);
    Some(joined.to_string())
}

/// Check if a URL belongs to the given domain (host plus port).
pub fn in_domain(url: &str, domain: &str) -> bool {
    domain_of(url).is_some_and(|d| d == domain)
}

fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
