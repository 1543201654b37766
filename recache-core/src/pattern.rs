//! Per-URL expiration patterns.
//!
//! Patterns are globs matched against the URL with its protocol scheme
//! stripped; `*` crosses path segments and a trailing `*` matches any
//! remainder. Patterns are checked in insertion order and the first
//! match wins.

use regex::Regex;
use tracing::debug;

use crate::expiration::Expiration;

/// Ordered mapping of URL glob patterns to expiration values.
#[derive(Clone, Debug, Default)]
pub struct UrlPatterns {
    patterns: Vec<(String, Expiration)>,
}

impl UrlPatterns {
    /// Create an empty pattern set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern. Patterns are evaluated in the order they were
    /// added.
    pub fn insert(&mut self, pattern: impl Into<String>, expire_after: impl Into<Expiration>) {
        self.patterns.push((pattern.into(), expire_after.into()));
    }

    /// Check for a matching per-URL expiration, if any.
    pub fn get_url_expiration(&self, url: &str) -> Option<&Expiration> {
        if url.is_empty() {
            return None;
        }
        for (pattern, expire_after) in &self.patterns {
            if url_match(url, pattern) {
                debug!(url, pattern, ?expire_after, "URL matched pattern");
                return Some(expire_after);
            }
        }
        None
    }

    /// Whether no patterns have been added.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<P: Into<String>, E: Into<Expiration>> FromIterator<(P, E)> for UrlPatterns {
    fn from_iter<T: IntoIterator<Item = (P, E)>>(iter: T) -> Self {
        let mut patterns = UrlPatterns::new();
        for (pattern, expire_after) in iter {
            patterns.insert(pattern, expire_after);
        }
        patterns
    }
}

/// Determine if a URL matches a glob pattern.
///
/// The base URL (without protocol) of both sides is used, and a
/// recursive wildcard is appended to the pattern if not already present,
/// so `example.com/api` matches any path under `/api`.
///
/// ```
/// use recache_core::url_match;
///
/// assert!(url_match("https://httpbin.org/delay/1", "httpbin.org/delay"));
/// assert!(url_match("https://httpbin.org/stream/1", "httpbin.org/*/1"));
/// assert!(!url_match("https://httpbin.org/stream/2", "httpbin.org/*/1"));
/// ```
pub fn url_match(url: &str, pattern: &str) -> bool {
    let url = strip_scheme(url);
    let pattern = format!("{}**", strip_scheme(pattern).trim_end_matches('*'));
    match Regex::new(&glob_to_regex(&pattern)) {
        Ok(regex) => regex.is_match(url),
        Err(_) => false,
    }
}

fn strip_scheme(url: &str) -> &str {
    url.rsplit("://").next().unwrap_or(url)
}

/// Translate a glob pattern into an anchored regex. `*` matches any
/// run of characters (including `/`) and `?` a single character.
fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                regex.push_str(&regex::escape(&literal));
                literal.clear();
                regex.push_str(if ch == '*' { ".*" } else { "." });
            }
            other => literal.push(other),
        }
    }
    regex.push_str(&regex::escape(&literal));
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_prefix_patterns() {
        assert!(url_match("https://httpbin.org/delay/1", "httpbin.org/delay"));
        assert!(url_match("http://httpbin.org/delay", "httpbin.org/delay"));
        assert!(!url_match("https://httpbin.org/stream/1", "httpbin.org/delay"));
    }

    #[test]
    fn wildcard_crosses_segments() {
        assert!(url_match("https://httpbin.org/stream/1", "httpbin.org/*/1"));
        assert!(!url_match("https://httpbin.org/stream/2", "httpbin.org/*/1"));
        assert!(url_match("https://site.com/a/b/c/end", "site.com/*/end"));
    }

    #[test]
    fn pattern_scheme_is_ignored() {
        assert!(url_match("https://example.com/api/v1", "https://example.com/api"));
        assert!(url_match("example.com/api/v1", "example.com/api*"));
    }

    #[test]
    fn first_matching_pattern_wins() {
        let patterns: UrlPatterns = [
            ("*.site_1.com", Expiration::Seconds(60)),
            ("site_2.com/resource_1", Expiration::Seconds(60 * 2)),
            ("site_2.com/resource_2", Expiration::Seconds(60 * 60)),
            ("site_2.com", Expiration::NeverExpire),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            patterns.get_url_expiration("https://img.site_1.com/image.jpg"),
            Some(&Expiration::Seconds(60))
        );
        assert_eq!(
            patterns.get_url_expiration("https://site_2.com/resource_1/index.html"),
            Some(&Expiration::Seconds(120))
        );
        assert_eq!(
            patterns.get_url_expiration("https://site_2.com/other"),
            Some(&Expiration::NeverExpire)
        );
        assert_eq!(patterns.get_url_expiration("https://site_3.com"), None);
    }
}
