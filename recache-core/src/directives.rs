//! `Cache-Control` directive parsing.
//!
//! Directives are kept as an ordered list of pairs rather than a map:
//! both the last-write-wins rule for duplicate keys and the `Expires`
//! header injection depend on insertion order.

use http::header::{CACHE_CONTROL, EXPIRES, HeaderMap, HeaderValue};

use crate::expiration::Expiration;

/// A single parsed `Cache-Control` directive value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// A bare token, e.g. `no-store`.
    Flag,
    /// A `key=value` token with an integer value, e.g. `max-age=60`.
    Int(i64),
    /// A `key=value` token whose value is not an integer. Kept verbatim;
    /// numeric comparisons treat it as absent.
    Raw(String),
}

/// Ordered collection of cache directives parsed from a header map.
///
/// Built from every `Cache-Control` header value (comma-separated lists
/// and repeated headers both contribute), plus the `Expires` header
/// injected under the `expires` key. Duplicate keys resolve to the last
/// occurrence.
#[derive(Clone, Debug, Default)]
pub struct CacheDirectives {
    entries: Vec<(String, Directive)>,
}

impl CacheDirectives {
    /// Parse all cache directives from a header map.
    ///
    /// Empty or absent headers yield an empty collection, never an error.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut entries = Vec::new();
        for value in headers.get_all(CACHE_CONTROL) {
            let Ok(value) = value.to_str() else { continue };
            for token in value.split(',') {
                if !token.trim().is_empty() {
                    entries.push(split_kv_directive(token));
                }
            }
        }
        if let Some(expires) = headers.get(EXPIRES).and_then(|v| v.to_str().ok()) {
            entries.push(("expires".to_owned(), Directive::Raw(expires.to_owned())));
        }
        CacheDirectives { entries }
    }

    /// Look up a directive by name (case-insensitive). The last
    /// occurrence wins.
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, directive)| directive)
    }

    /// Whether a directive with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The integer value of a directive, if it has one.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Directive::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The `max-age` directive as an expiration, if present with an
    /// integer value.
    pub fn max_age(&self) -> Option<Expiration> {
        self.int("max-age").map(Expiration::Seconds)
    }

    /// The injected `Expires` header as an expiration, if present.
    pub fn expires(&self) -> Option<Expiration> {
        match self.get("expires")? {
            Directive::Raw(value) => Some(Expiration::HttpDate(value.clone())),
            _ => None,
        }
    }

    /// Whether no directives were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a single cache directive token into a `(key, value)` pair.
///
/// `key=value` tokens parse the value as an integer when possible and
/// keep it verbatim otherwise; bare tokens become [`Directive::Flag`].
pub fn split_kv_directive(token: &str) -> (String, Directive) {
    let token = token.trim();
    match token.split_once('=') {
        Some((key, value)) => {
            let directive = match value.trim().parse::<i64>() {
                Ok(int) => Directive::Int(int),
                Err(_) => Directive::Raw(value.to_owned()),
            };
            (key.to_owned(), directive)
        }
        None => (token.to_owned(), Directive::Flag),
    }
}

/// Append a `Cache-Control` directive to existing headers (if any).
///
/// Invalid directive strings that cannot be represented as a header
/// value leave the headers untouched.
pub fn append_directive(headers: &mut HeaderMap, directive: &str) {
    let joined = match headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing},{directive}"),
        _ => directive.to_owned(),
    };
    if let Ok(value) = HeaderValue::from_str(&joined) {
        headers.insert(CACHE_CONTROL, value);
    }
}
