use http::{Method, StatusCode};
use recache_core::{CacheSettings, Expiration, UrlPatterns};

/// Session-wide cache configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Policy settings consumed by the decision engine.
    pub cache: CacheSettings,
    /// Only responses with one of these status codes are cached.
    pub allowable_codes: Vec<StatusCode>,
    /// Only responses to one of these methods are cached.
    pub allowable_methods: Vec<Method>,
    /// Serve a stale cached response when a re-fetch fails.
    pub stale_if_error: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cache: CacheSettings::default(),
            allowable_codes: vec![StatusCode::OK],
            allowable_methods: vec![Method::GET, Method::HEAD],
            stale_if_error: false,
        }
    }
}

impl SessionConfig {
    /// Honor `Cache-Control` header semantics.
    pub fn cache_control(mut self, enabled: bool) -> Self {
        self.cache.cache_control = enabled;
        self
    }

    /// Default expiration for entries without any other source.
    pub fn expire_after(mut self, expire_after: impl Into<Expiration>) -> Self {
        self.cache.expire_after = Some(expire_after.into());
        self
    }

    /// Per-URL-pattern expirations, first match wins.
    pub fn urls_expire_after(mut self, patterns: UrlPatterns) -> Self {
        self.cache.urls_expire_after = patterns;
        self
    }

    /// Replace the set of cacheable status codes.
    pub fn allowable_codes(mut self, codes: impl IntoIterator<Item = StatusCode>) -> Self {
        self.allowable_codes = codes.into_iter().collect();
        self
    }

    /// Replace the set of cacheable methods.
    pub fn allowable_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.allowable_methods = methods.into_iter().collect();
        self
    }

    /// Fall back to stale entries when a re-fetch fails.
    pub fn stale_if_error(mut self, enabled: bool) -> Self {
        self.stale_if_error = enabled;
        self
    }
}
