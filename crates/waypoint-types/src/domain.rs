//! Domain normalization for visited URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Hierarchical scheme prefix, e.g. `https://`.
static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// Opaque URLs without an authority (`about:blank`, `mailto:a@b`).
/// A colon followed by a digit is a port, not a scheme.
static OPAQUE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^0-9]").unwrap());

static HOST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9_.\-]*[a-z0-9])?|\[[0-9a-f:.]+\])$").unwrap()
});

/// Extract the normalized domain from a URL.
///
/// The scheme, credentials, port, path, query and fragment are dropped, the
/// host is lower-cased and a leading `www.` is removed. Returns `None` when no
/// usable host can be found (opaque URLs, empty input, stray whitespace).
pub fn normalize_domain(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let rest = match SCHEME_REGEX.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None if OPAQUE_REGEX.is_match(trimmed) => return None,
        None => trimmed,
    };

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();

    let host = if host_port.starts_with('[') {
        // IPv6 literal keeps its brackets; the port follows the closing one.
        match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => return None,
        }
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    let host = host.trim_end_matches('.').to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.is_empty() || !HOST_REGEX.is_match(host) {
        return None;
    }

    Some(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scheme_and_www() {
        assert_eq!(
            normalize_domain("https://www.github.com/rust-lang/rust"),
            Some("github.com".to_string())
        );
        assert_eq!(
            normalize_domain("http://news.ycombinator.com/item?id=1"),
            Some("news.ycombinator.com".to_string())
        );
    }

    #[test]
    fn test_lowercases_and_drops_port_and_credentials() {
        assert_eq!(
            normalize_domain("HTTPS://User:pw@WWW.Example.COM:8443/path#frag"),
            Some("example.com".to_string())
        );
        assert_eq!(
            normalize_domain("localhost:3000/dashboard"),
            Some("localhost".to_string())
        );
    }

    #[test]
    fn test_schemeless_host() {
        assert_eq!(normalize_domain("docs.rs"), Some("docs.rs".to_string()));
        assert_eq!(normalize_domain("  www.docs.rs/  "), Some("docs.rs".to_string()));
    }

    #[test]
    fn test_ipv6_literal() {
        assert_eq!(
            normalize_domain("http://[::1]:8080/"),
            Some("[::1]".to_string())
        );
    }

    #[test]
    fn test_rejects_unusable_input() {
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain("about:blank"), None);
        assert_eq!(normalize_domain("mailto:someone@example.com"), None);
        assert_eq!(normalize_domain("https:///nohost"), None);
        assert_eq!(normalize_domain("https://bad host.com/"), None);
    }
}
