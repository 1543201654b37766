use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use recache_core::CacheKey;
use recache_http::{CachedResponse, LiveResponse};

/// The outcome of one session request: either a fresh response from the
/// transport or an entry served from the cache.
///
/// Both variants expose the same observable surface, so callers can
/// treat cache hits and misses uniformly and check [`from_cache`]
/// (Self::from_cache) only when the distinction matters.
#[derive(Clone, Debug)]
pub enum SessionResponse {
    /// A response freshly fetched over the transport.
    Live {
        /// The key the response was (or would have been) stored under.
        cache_key: CacheKey,
        /// The response as the transport produced it.
        response: LiveResponse,
    },
    /// A response served from the cache.
    Cached(CachedResponse),
}

impl SessionResponse {
    /// Whether this response was served from the cache.
    pub fn from_cache(&self) -> bool {
        matches!(self, SessionResponse::Cached(_))
    }

    /// Response status code.
    pub fn status(&self) -> StatusCode {
        match self {
            SessionResponse::Live { response, .. } => response.status,
            SessionResponse::Cached(cached) => cached.status(),
        }
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        match self {
            SessionResponse::Live { response, .. } => &response.headers,
            SessionResponse::Cached(cached) => cached.headers(),
        }
    }

    /// Response body bytes.
    pub fn body(&self) -> &Bytes {
        match self {
            SessionResponse::Live { response, .. } => &response.body,
            SessionResponse::Cached(cached) => cached.body(),
        }
    }

    /// The URL this response was fetched from.
    pub fn url(&self) -> &str {
        match self {
            SessionResponse::Live { response, .. } => &response.url,
            SessionResponse::Cached(cached) => cached.url(),
        }
    }

    /// The cache key associated with this response.
    pub fn cache_key(&self) -> Option<&CacheKey> {
        match self {
            SessionResponse::Live { cache_key, .. } => Some(cache_key),
            SessionResponse::Cached(cached) => cached.cache_key(),
        }
    }

    /// Whether the served entry is past its expiration. Always false
    /// for live responses.
    pub fn is_expired(&self) -> bool {
        match self {
            SessionResponse::Live { .. } => false,
            SessionResponse::Cached(cached) => cached.is_expired(),
        }
    }

    /// The cached entry, if this response came from the cache.
    pub fn as_cached(&self) -> Option<&CachedResponse> {
        match self {
            SessionResponse::Live { .. } => None,
            SessionResponse::Cached(cached) => Some(cached),
        }
    }
}
