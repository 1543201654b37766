//! Session-level cache settings and per-request overrides.

use crate::expiration::Expiration;
use crate::pattern::UrlPatterns;

/// Cache settings shared by every request in a session.
#[derive(Clone, Debug, Default)]
pub struct CacheSettings {
    /// Honor `Cache-Control` header semantics on requests and responses.
    pub cache_control: bool,
    /// Default expiration applied when no other source provides one.
    pub expire_after: Option<Expiration>,
    /// Per-URL-pattern expirations, checked in insertion order.
    pub urls_expire_after: UrlPatterns,
}

impl CacheSettings {
    /// Settings with `Cache-Control` semantics enabled and no defaults.
    pub fn with_cache_control() -> Self {
        CacheSettings {
            cache_control: true,
            ..Default::default()
        }
    }
}

/// Per-request behavior overrides.
///
/// Each field widens the corresponding session/header-derived behavior;
/// none of them can narrow it.
#[derive(Clone, Debug, Default)]
pub struct RequestOverrides {
    /// Expiration for this request only; takes precedence over URL
    /// patterns and the session default.
    pub expire_after: Option<Expiration>,
    /// Only return results from the cache; synthesize a 504 on a miss.
    pub only_if_cached: bool,
    /// Always make a new request and overwrite any cached response.
    pub refresh: bool,
    /// Revalidate with the server before using a cached response.
    pub revalidate: bool,
}

impl RequestOverrides {
    /// Override the expiration for this request.
    pub fn expire_after(mut self, expire_after: impl Into<Expiration>) -> Self {
        self.expire_after = Some(expire_after.into());
        self
    }

    /// Serve only from the cache.
    pub fn only_if_cached(mut self) -> Self {
        self.only_if_cached = true;
        self
    }

    /// Force a new request, skipping the cache read.
    pub fn refresh(mut self) -> Self {
        self.refresh = true;
        self
    }

    /// Force revalidation of any cached response.
    pub fn revalidate(mut self) -> Self {
        self.revalidate = true;
        self
    }
}
