use regex::Regex;
use std::sync::LazyLock;

static HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://([^/]+)").expect("host pattern is valid"));

/// The `host` part of a `scheme://host/rest` URL, for display.
///
/// Anything not of that shape is returned whole; no URL is ever rejected.
///
/// ```
/// use unfurl_preview::display_domain;
///
/// assert_eq!(display_domain("https://example.com/a/b?c"), "example.com");
/// assert_eq!(display_domain("mailto:someone@example.com"), "mailto:someone@example.com");
/// ```
pub fn display_domain(url: &str) -> &str {
    HOST.captures(url).and_then(|captures| captures.get(1)).map_or(url, |host| host.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/a", "example.com")]
    #[case("http://example.com", "example.com")]
    #[case("HTTPS://Example.COM/path", "Example.COM")]
    #[case("https://user@sub.example.com:8443/x", "user@sub.example.com:8443")]
    #[case("ftp://files.example.org/pub/", "files.example.org")]
    #[case("git+ssh://host/repo", "host")]
    #[case("https://example.com?query=1", "example.com?query=1")]
    #[case("example.com/a", "example.com/a")]
    #[case("https:///no-host", "https:///no-host")]
    #[case("not a url", "not a url")]
    #[case("", "")]
    fn test_display_domain(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(display_domain(url), expected);
    }
}
