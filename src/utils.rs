//! Stateless URL helpers: protocol, slash and port handling.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{Result, SearchError};

/// Host-name pattern used to tell literal destinations apart from search terms.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(https?://)?(\b([A-Za-z0-9]+([A-Za-z0-9-])*([A-Za-z0-9])*\b)\.)+[a-z]{2,}/?")
        .unwrap()
});

static PORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":([0-9]{1,5})").unwrap());

static PROTOCOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Returns `true` if the value looks like a host name, optionally with a scheme.
pub fn is_url_like(value: &str) -> bool {
    URL_PATTERN.is_match(value)
}

/// Returns the leading `http://` or `https://` of a URL, if any.
pub fn extract_protocol(url: &str) -> Option<&str> {
    PROTOCOL_PATTERN.find(url).map(|m| &url[..m.end()])
}

/// Returns `true` if the URL starts with `http://` or `https://`.
pub fn has_protocol(url: &str) -> bool {
    PROTOCOL_PATTERN.is_match(url)
}

/// Strips a leading `http://` or `https://`.
pub fn remove_protocol(url: &str) -> &str {
    match PROTOCOL_PATTERN.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

/// Prefixes `https://` (or `http://`) unless the URL already carries a protocol.
pub fn prefix_protocol(url: &str, use_http: bool) -> String {
    if has_protocol(url) {
        return url.to_string();
    }
    let scheme = if use_http { "http://" } else { "https://" };
    format!("{}{}", scheme, url)
}

/// Prefixes a protocol when missing and returns the normalized URL string.
///
/// An existing protocol is kept as-is. This is the only place where a
/// malformed URL surfaces as an error.
pub fn with_protocol(url: &str, use_http: bool) -> Result<String> {
    Url::parse(&prefix_protocol(url, use_http))
        .map(|parsed| parsed.to_string())
        .map_err(|e| SearchError::invalid_url(url, e))
}

/// Splits a protocol-less URL into its host segment and the rest, which
/// starts at the first `/`, `?` or `#`.
fn split_host(url: &str) -> (&str, &str) {
    match url.find(|c: char| matches!(c, '/' | '?' | '#')) {
        Some(index) if index > 0 => url.split_at(index),
        _ => (url, ""),
    }
}

/// Returns the port already embedded in the host segment of a URL.
pub fn existing_port(url: &str) -> Option<&str> {
    let (host, _) = split_host(remove_protocol(url));
    PORT_PATTERN
        .captures(host)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns the URL with its port set to `port`, inserting or rewriting it.
fn port_variant(url: &str, port: u16) -> String {
    let protocol = extract_protocol(url).unwrap_or("");
    let (host, path) = split_host(remove_protocol(url));

    match PORT_PATTERN.captures(host).and_then(|caps| caps.get(1)) {
        Some(m) if m.as_str() == port.to_string() => url.to_string(),
        Some(m) => format!(
            "{}{}{}{}{}",
            protocol,
            &host[..m.start()],
            port,
            &host[m.end()..],
            path
        ),
        None => format!("{}{}:{}{}", protocol, host, port, path),
    }
}

/// Applies a port override to a URL.
///
/// - no embedded port: `:port` is inserted after the host
/// - same embedded port: the URL is returned unchanged
/// - different embedded port: both the original and the rewritten URL are returned
pub fn with_port(url: &str, port: u16) -> Vec<String> {
    with_ports(url, &[port])
}

/// Applies every port override to a URL, in order.
///
/// With no ports the URL is returned as the only element. A URL carrying its
/// own port that none of the overrides reproduce is kept in front of the
/// rewritten variants.
pub fn with_ports(url: &str, ports: &[u16]) -> Vec<String> {
    if ports.is_empty() {
        return vec![url.to_string()];
    }

    let variants: Vec<String> = ports.iter().map(|&port| port_variant(url, port)).collect();

    if existing_port(url).is_some() && !variants.iter().any(|v| v == url) {
        let mut urls = Vec::with_capacity(variants.len() + 1);
        urls.push(url.to_string());
        urls.extend(variants);
        return urls;
    }

    variants
}

/// Leading and trailing slash helpers used to join path segments.
pub mod slash {
    /// Joins a base URL and a path segment with exactly one `/` between them.
    pub fn join(base: &str, segment: &str) -> String {
        format!("{}{}", trailing::add(base), leading::remove(segment))
    }

    pub mod leading {
        pub fn add(value: &str) -> String {
            if value.starts_with('/') {
                value.to_string()
            } else {
                format!("/{}", value)
            }
        }

        pub fn remove(value: &str) -> &str {
            value.trim_start_matches('/')
        }
    }

    pub mod trailing {
        pub fn add(value: &str) -> String {
            if value.ends_with('/') {
                value.to_string()
            } else {
                format!("{}/", value)
            }
        }

        pub fn remove(value: &str) -> &str {
            value.trim_end_matches('/')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url_like() {
        assert!(is_url_like("google.com"));
        assert!(is_url_like("https://github.com/rust-lang"));
        assert!(is_url_like("example.com:3000"));
        assert!(is_url_like("sub.domain.co.uk"));
        assert!(!is_url_like("rust"));
        assert!(!is_url_like("localhost:3000"));
        assert!(!is_url_like("1.5"));
    }

    #[test]
    fn test_extract_protocol() {
        assert_eq!(extract_protocol("https://a.com"), Some("https://"));
        assert_eq!(extract_protocol("http://a.com"), Some("http://"));
        assert_eq!(extract_protocol("a.com"), None);
        assert_eq!(extract_protocol("a.com/?next=https://b.com"), None);
    }

    #[test]
    fn test_remove_protocol() {
        assert_eq!(remove_protocol("https://a.com/x"), "a.com/x");
        assert_eq!(remove_protocol("http://a.com"), "a.com");
        assert_eq!(remove_protocol("a.com"), "a.com");
        assert_eq!(remove_protocol("httpbin.org"), "httpbin.org");
    }

    #[test]
    fn test_prefix_protocol_does_not_normalize() {
        assert_eq!(
            prefix_protocol("google.com/search?q=foo bar", false),
            "https://google.com/search?q=foo bar"
        );
        assert_eq!(prefix_protocol("HTTP://a.com", false), "HTTP://a.com");
    }

    #[test]
    fn test_with_protocol_adds_https() {
        assert_eq!(with_protocol("example.com", false).unwrap(), "https://example.com/");
    }

    #[test]
    fn test_with_protocol_adds_http() {
        assert_eq!(with_protocol("example.com", true).unwrap(), "http://example.com/");
    }

    #[test]
    fn test_with_protocol_keeps_existing() {
        assert_eq!(with_protocol("http://example.com/a", false).unwrap(), "http://example.com/a");
        assert_eq!(with_protocol("https://example.com", true).unwrap(), "https://example.com/");
    }

    #[test]
    fn test_with_protocol_invalid() {
        let result = with_protocol("exa mple.com:99999", false);
        assert!(matches!(result, Err(SearchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_existing_port() {
        assert_eq!(existing_port("example.com:3000"), Some("3000"));
        assert_eq!(existing_port("https://example.com:8080/path"), Some("8080"));
        assert_eq!(existing_port("https://example.com/path"), None);
        assert_eq!(existing_port("example.com/a?b=:12"), None);
        assert_eq!(existing_port("example.com?b=:12"), None);
        assert_eq!(existing_port("example.com:81?b=1"), Some("81"));
    }

    #[test]
    fn test_with_port_inserts() {
        assert_eq!(with_port("example.com", 8080), vec!["example.com:8080"]);
        assert_eq!(
            with_port("https://example.com/docs/api", 3000),
            vec!["https://example.com:3000/docs/api"]
        );
    }

    #[test]
    fn test_with_port_before_query_and_fragment() {
        assert_eq!(with_port("foo.com?x=1", 8080), vec!["foo.com:8080?x=1"]);
        assert_eq!(with_port("foo.com#top", 8080), vec!["foo.com:8080#top"]);
        assert_eq!(
            with_port("https://foo.com:3000?x=1", 3000),
            vec!["https://foo.com:3000?x=1"]
        );
        assert_eq!(
            with_protocol(&with_port("foo.com?x=1", 8080)[0], false).unwrap(),
            "https://foo.com:8080/?x=1"
        );
    }

    #[test]
    fn test_with_port_same_port_unchanged() {
        assert_eq!(with_port("example.com:3000/x", 3000), vec!["example.com:3000/x"]);
    }

    #[test]
    fn test_with_port_different_port_keeps_both() {
        assert_eq!(
            with_port("https://example.com:3000/x", 4000),
            vec!["https://example.com:3000/x", "https://example.com:4000/x"]
        );
    }

    #[test]
    fn test_with_port_idempotent() {
        for url in ["example.com", "http://example.com/a", "example.com:9000/b"] {
            let once = with_port(url, 8080);
            let last = once.last().unwrap();
            assert_eq!(with_port(last, 8080), vec![last.clone()]);
        }
    }

    #[test]
    fn test_with_ports_multiple() {
        assert_eq!(
            with_ports("example.com", &[80, 8080]),
            vec!["example.com:80", "example.com:8080"]
        );
    }

    #[test]
    fn test_with_ports_existing_port_listed() {
        assert_eq!(
            with_ports("example.com:8080", &[80, 8080]),
            vec!["example.com:80", "example.com:8080"]
        );
    }

    #[test]
    fn test_with_ports_existing_port_not_listed() {
        assert_eq!(
            with_ports("example.com:3000", &[80, 8080]),
            vec!["example.com:3000", "example.com:80", "example.com:8080"]
        );
    }

    #[test]
    fn test_with_ports_empty() {
        assert_eq!(with_ports("example.com:3000", &[]), vec!["example.com:3000"]);
    }

    #[test]
    fn test_slash_trailing() {
        assert_eq!(slash::trailing::add("a.com"), "a.com/");
        assert_eq!(slash::trailing::add("a.com/"), "a.com/");
        assert_eq!(slash::trailing::remove("a.com/"), "a.com");
        assert_eq!(slash::trailing::remove("a.com"), "a.com");
    }

    #[test]
    fn test_slash_leading() {
        assert_eq!(slash::leading::add("search"), "/search");
        assert_eq!(slash::leading::add("/search"), "/search");
        assert_eq!(slash::leading::remove("/search"), "search");
        assert_eq!(slash::leading::remove("search"), "search");
    }

    #[test]
    fn test_slash_idempotent() {
        for value in ["", "/", "a", "/a/", "//a//"] {
            let added = slash::trailing::add(value);
            assert_eq!(slash::trailing::add(&added), added);
            let added = slash::leading::add(value);
            assert_eq!(slash::leading::add(&added), added);
            let removed = slash::trailing::remove(value);
            assert_eq!(slash::trailing::remove(removed), removed);
            let removed = slash::leading::remove(value);
            assert_eq!(slash::leading::remove(removed), removed);
        }
    }

    #[test]
    fn test_slash_join() {
        assert_eq!(slash::join("github.com", "issues"), "github.com/issues");
        assert_eq!(slash::join("github.com/", "/issues"), "github.com/issues");
    }
}
