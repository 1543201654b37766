use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use recache_core::cacheable::{CachedEntry, HasHeaders};
use recache_core::{CacheKey, Expiration, get_expiration_datetime};

use crate::request::CachedRequest;

/// A live HTTP response as produced by a transport.
///
/// The body has already been read and decoded by the transport; this
/// type never performs I/O. It is the live variant of the response
/// capability set, with [`CachedResponse`] as the cached variant.
#[derive(Clone, Debug)]
pub struct LiveResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Reason phrase, if the transport reported one.
    pub reason: Option<String>,
    /// Protocol version, e.g. `HTTP/1.1`.
    pub version: String,
    /// The final URL of the response.
    pub url: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Fully read, decoded response body.
    pub body: Bytes,
    /// Time elapsed between sending the request and the response.
    pub elapsed: Duration,
    /// Snapshot of the request that produced this response.
    pub request: CachedRequest,
    /// Redirect chain that led to this response, oldest first.
    pub history: Vec<LiveResponse>,
    /// The next request of a redirect continuation, if any.
    pub next: Option<CachedRequest>,
}

impl Default for LiveResponse {
    fn default() -> Self {
        LiveResponse {
            status: StatusCode::OK,
            reason: None,
            version: "HTTP/1.1".to_owned(),
            url: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            elapsed: Duration::ZERO,
            request: CachedRequest::default(),
            history: Vec::new(),
            next: None,
        }
    }
}

impl LiveResponse {
    /// Whether this response is a redirect with a continuation target.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection() && self.headers.contains_key(LOCATION)
    }
}

impl HasHeaders for LiveResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// A cookie captured from a `Set-Cookie` response header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

/// A cached HTTP response, reproducing a live response's observable
/// surface from serialization-safe state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Not serialized; assigned by the store when the entry is read.
    #[serde(skip)]
    cache_key: Option<CacheKey>,
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    reason: Option<String>,
    version: String,
    url: String,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
    encoding: Option<String>,
    cookies: Vec<Cookie>,
    elapsed: Duration,
    created_at: DateTime<Utc>,
    expires: Option<DateTime<Utc>>,
    history: Vec<CachedResponse>,
    request: CachedRequest,
    next: Option<CachedRequest>,
}

impl CachedResponse {
    /// Create a cached response from a live response at the moment a
    /// cacheable response is received.
    ///
    /// The redirect history is copied one level deep: if the original
    /// is itself a redirect its own history is left empty, so
    /// redirects-of-redirects never nest.
    pub fn from_response(original: &LiveResponse, expires: Option<DateTime<Utc>>) -> Self {
        let history = if original.is_redirect() {
            Vec::new()
        } else {
            original
                .history
                .iter()
                .map(|redirect| CachedResponse::from_response(redirect, None))
                .collect()
        };

        CachedResponse {
            cache_key: None,
            status: original.status,
            reason: original
                .reason
                .clone()
                .or_else(|| original.status.canonical_reason().map(str::to_owned)),
            version: original.version.clone(),
            url: original.url.clone(),
            headers: original.headers.clone(),
            body: original.body.clone(),
            encoding: detect_encoding(&original.headers),
            cookies: capture_cookies(&original.headers),
            elapsed: original.elapsed,
            created_at: Utc::now(),
            expires,
            history,
            request: original.request.clone(),
            next: original.next.clone(),
        }
    }

    /// Cheap re-stamping of an already-cached response with a new
    /// expiration, used on revalidation. The cache key is cleared; the
    /// store assigns it again at read time.
    pub fn restamp(&self, expires: Option<DateTime<Utc>>) -> Self {
        let mut copy = self.clone();
        copy.expires = expires;
        copy.cache_key = None;
        copy
    }

    /// Synthesized `504 Not Cached` response, returned when a request
    /// may only be served from the cache and no usable entry exists.
    pub fn not_cached(request: CachedRequest) -> Self {
        CachedResponse {
            cache_key: None,
            status: StatusCode::GATEWAY_TIMEOUT,
            reason: Some("Not Cached".to_owned()),
            version: "HTTP/1.1".to_owned(),
            url: request.url().to_owned(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            encoding: None,
            cookies: Vec::new(),
            elapsed: Duration::ZERO,
            created_at: Utc::now(),
            expires: None,
            history: Vec::new(),
            request,
            next: None,
        }
    }

    /// Set a new expiration for this response, and determine if it is
    /// now expired.
    pub fn reset_expiration(&mut self, expire_after: Option<&Expiration>) -> bool {
        self.expires = get_expiration_datetime(expire_after);
        self.is_expired()
    }

    /// Rebuild a live-capable `http` response from the stored state.
    ///
    /// This is the explicit post-deserialization reconstruction step:
    /// the returned response streams the stored body exactly as the
    /// original would.
    pub fn rehydrate(&self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.version_mut() = parse_version(&self.version);
        *response.headers_mut() = self.headers.clone();
        response
    }

    /// Whether this cached response is expired.
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() >= expires)
    }

    /// Time to expiration in seconds. Absent when the response never
    /// expires or is already expired.
    pub fn ttl(&self) -> Option<i64> {
        let expires = self.expires?;
        if self.is_expired() {
            return None;
        }
        Some((expires - Utc::now()).num_seconds())
    }

    /// Size of the response body in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// A fresh outgoing request for the next hop of a redirect chain,
    /// if there is one.
    pub fn next(&self) -> Option<http::Request<Bytes>> {
        self.next.as_ref().and_then(|request| request.prepare().ok())
    }

    /// Always true for this type; live responses report false.
    pub fn from_cache(&self) -> bool {
        true
    }

    /// The key this entry was stored under, if it has been read from a
    /// store.
    pub fn cache_key(&self) -> Option<&CacheKey> {
        self.cache_key.as_ref()
    }

    /// Stamp the cache key. Called by the store at read time.
    pub fn set_cache_key(&mut self, cache_key: CacheKey) {
        self.cache_key = Some(cache_key);
    }

    /// Response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// The URL this response was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers, used to merge revalidation headers
    /// after a 304.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Response body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body text encoding, from the `Content-Type` charset.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Cookies captured from the response.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Time elapsed while fetching the original response.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// When this entry was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When this entry expires; absent means it never expires.
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Replace the expiration instant directly.
    pub fn set_expires(&mut self, expires: Option<DateTime<Utc>>) {
        self.expires = expires;
    }

    /// The redirect chain that led to this response.
    pub fn history(&self) -> &[CachedResponse] {
        &self.history
    }

    /// The request snapshot this response was produced from.
    pub fn request(&self) -> &CachedRequest {
        &self.request
    }
}

impl HasHeaders for CachedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl CachedEntry for CachedResponse {
    fn is_expired(&self) -> bool {
        CachedResponse::is_expired(self)
    }
}

impl fmt::Display for CachedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request: {} {}, response: {} ({}), created: {}, expires: {} ({})",
            self.request.method(),
            self.request.url(),
            self.status,
            format_file_size(self.size()),
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            match self.expires {
                Some(expires) => expires.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => "N/A".to_owned(),
            },
            if self.is_expired() { "stale" } else { "fresh" },
        )
    }
}

/// Convert a size in bytes into a human-readable form.
fn format_file_size(n_bytes: usize) -> String {
    let mut size = n_bytes as f64;
    for unit in ["bytes", "KiB", "MiB"] {
        if size < 1024.0 {
            return if unit == "bytes" {
                format!("{n_bytes} {unit}")
            } else {
                format!("{size:.2} {unit}")
            };
        }
        size /= 1024.0;
    }
    format!("{size:.2} GiB")
}

fn parse_version(version: &str) -> http::Version {
    match version {
        "HTTP/0.9" => http::Version::HTTP_09,
        "HTTP/1.0" => http::Version::HTTP_10,
        "HTTP/1.1" => http::Version::HTTP_11,
        "HTTP/2.0" | "HTTP/2" => http::Version::HTTP_2,
        "HTTP/3.0" | "HTTP/3" => http::Version::HTTP_3,
        _ => http::Version::default(),
    }
}

fn detect_encoding(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        key.eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches('"').to_owned())
    })
}

fn capture_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| {
            let value = value.to_str().ok()?;
            let pair = value.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            Some(Cookie {
                name: name.trim().to_owned(),
                value: value.trim().to_owned(),
            })
        })
        .collect()
}
