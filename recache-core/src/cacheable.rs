//! Capability traits linking the policy engine to response types.
//!
//! The engine only needs header access and an expiry check, so it
//! depends on these seams rather than on concrete response models. Both
//! the live and cached response variants implement them.

use http::HeaderMap;
use http::header::{ETAG, LAST_MODIFIED};

/// Anything that exposes an HTTP header map.
pub trait HasHeaders {
    /// The headers of this subject.
    fn headers(&self) -> &HeaderMap;
}

impl<B> HasHeaders for http::Request<B> {
    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }
}

impl<B> HasHeaders for http::Response<B> {
    fn headers(&self) -> &HeaderMap {
        http::Response::headers(self)
    }
}

impl HasHeaders for HeaderMap {
    fn headers(&self) -> &HeaderMap {
        self
    }
}

/// A stored cache entry, as seen by the policy engine.
pub trait CachedEntry: HasHeaders {
    /// Whether the entry's expiration time has passed.
    fn is_expired(&self) -> bool;
}

/// Whether the headers carry a validator usable for conditional
/// requests (`ETag` or `Last-Modified`).
pub fn has_validator(headers: &HeaderMap) -> bool {
    headers.contains_key(ETAG) || headers.contains_key(LAST_MODIFIED)
}
