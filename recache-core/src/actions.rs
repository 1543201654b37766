//! Translation of cache settings and headers into concrete actions.
//!
//! [`CacheActions`] decides, for one request/response cycle, whether to
//! read from the cache, write to it, revalidate an existing entry, and
//! when the entry should expire. It is computed in three steps, in this
//! order and never the reverse:
//!
//! 1. [`CacheActions::from_request`] — from the outgoing request
//! 2. [`CacheActions::update_from_cached_response`] — after fetching a
//!    cached entry, before potentially sending a new request
//! 3. [`CacheActions::update_from_response`] — after receiving a fresh
//!    response, before saving it

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use tracing::debug;

use crate::cacheable::{CachedEntry, HasHeaders, has_validator};
use crate::directives::CacheDirectives;
use crate::expiration::{Expiration, get_expiration_datetime};
use crate::key::CacheKey;
use crate::settings::{CacheSettings, RequestOverrides};

/// One-shot signal header forcing a cache-skipping refresh.
///
/// Set by the session when the `refresh` override must survive request
/// preparation; removed from the headers before the request is sent.
pub const REFRESH_HEADER: &str = "recache-refresh";

/// Cache actions resolved for a single request/response cycle.
#[derive(Clone, Debug)]
pub struct CacheActions {
    cache_control: bool,
    cache_key: CacheKey,
    expire_after: Option<Expiration>,
    only_if_cached: bool,
    request_directives: CacheDirectives,
    revalidate: bool,
    skip_read: bool,
    skip_write: bool,
    validation_headers: HeaderMap,
}

impl CacheActions {
    /// Initialize from request info and cache settings.
    ///
    /// If `Cache-Control` semantics are enabled, the final expiration is
    /// settled later in [`update_from_response`](Self::update_from_response)
    /// since response headers may override it; the value resolved here
    /// is provisional and only used for write-skip detection.
    ///
    /// The [`REFRESH_HEADER`] signal, if present, is removed from the
    /// request headers and forces a cache-read skip.
    pub fn from_request<B>(
        cache_key: CacheKey,
        request: &mut http::Request<B>,
        settings: &CacheSettings,
        overrides: &RequestOverrides,
    ) -> Self {
        let directives = CacheDirectives::from_headers(request.headers());
        if !directives.is_empty() {
            debug!(?directives, "cache directives from request headers");
        }

        // Check expiration values in order of precedence
        let url = request.uri().to_string();
        let expire_after = directives
            .max_age()
            .or_else(|| overrides.expire_after.clone())
            .or_else(|| {
                settings
                    .urls_expire_after
                    .get_url_expiration(&url)
                    .cloned()
            })
            .or_else(|| settings.expire_after.clone());

        // Check conditions for cache read and write based on overrides
        // and request headers
        let refresh_signal = request.headers_mut().remove(REFRESH_HEADER).is_some();
        let check_expiration = if settings.cache_control {
            directives.max_age()
        } else {
            expire_after.clone()
        };
        let skip_write = matches!(&check_expiration, Some(e) if e.is_do_not_cache())
            || directives.contains("no-store");

        // These behaviors may be set by either request headers or overrides
        let only_if_cached = overrides.only_if_cached || directives.contains("only-if-cached");
        let revalidate = overrides.revalidate || directives.contains("no-cache");
        let skip_read = skip_write || overrides.refresh || refresh_signal;

        CacheActions {
            cache_control: settings.cache_control,
            cache_key,
            expire_after,
            only_if_cached,
            request_directives: directives,
            revalidate,
            skip_read,
            skip_write,
            validation_headers: HeaderMap::new(),
        }
    }

    /// The resolved expiration as an absolute UTC instant.
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        get_expiration_datetime(self.expire_after.as_ref())
    }

    /// Check a fetched cached response for relevant cache headers and
    /// set up a conditional request, if possible.
    ///
    /// Revalidation requires a validator on the cached entry and is
    /// triggered by staleness, a prior revalidate decision, or the
    /// entry's own `no-cache`/`must-revalidate` directives.
    pub fn update_from_cached_response<E: CachedEntry>(&mut self, response: Option<&E>) {
        let Some(response) = response else { return };

        let directives = CacheDirectives::from_headers(response.headers());
        self.revalidate = has_validator(response.headers())
            && (response.is_expired()
                || self.revalidate
                || directives.contains("no-cache")
                || (directives.contains("must-revalidate") && directives.int("max-age") == Some(0)));

        if self.revalidate {
            if let Some(etag) = response.headers().get(ETAG) {
                self.validation_headers.insert(IF_NONE_MATCH, etag.clone());
            }
            if let Some(last_modified) = response.headers().get(LAST_MODIFIED) {
                self.validation_headers
                    .insert(IF_MODIFIED_SINCE, last_modified.clone());
            }
        }
    }

    /// Update expiration and write decision from the headers of a new
    /// response. No-op unless `Cache-Control` semantics are enabled.
    ///
    /// A zero expiration or `no-store` normally skips the write, but a
    /// response carrying a validator is stored anyway and revalidated
    /// on use.
    pub fn update_from_response<R: HasHeaders>(&mut self, response: Option<&R>) {
        let Some(response) = response else { return };
        if !self.cache_control {
            return;
        }

        let directives = CacheDirectives::from_headers(response.headers());
        if !directives.is_empty() {
            debug!(?directives, "cache directives from response headers");
        }

        if directives.contains("immutable") {
            self.expire_after = Some(Expiration::NeverExpire);
        } else {
            let from_headers = directives.max_age().or_else(|| directives.expires());
            self.expire_after = from_headers.or_else(|| self.expire_after.take());
        }
        let no_store =
            directives.contains("no-store") || self.request_directives.contains("no-store");

        let expire_immediately = matches!(&self.expire_after, Some(e) if e.is_do_not_cache());
        self.skip_write =
            (expire_immediately || no_store) && !has_validator(response.headers());
        if self.skip_write {
            debug!(cache_key = %self.cache_key, "response will not be written to the cache");
        }
    }

    /// The cache key this cycle operates on.
    pub fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }

    /// The currently resolved expiration value, if any.
    pub fn expire_after(&self) -> Option<&Expiration> {
        self.expire_after.as_ref()
    }

    /// Serve only from the cache, without sending a request.
    pub fn only_if_cached(&self) -> bool {
        self.only_if_cached
    }

    /// Revalidate the cached entry before using it.
    pub fn revalidate(&self) -> bool {
        self.revalidate
    }

    /// Skip reading from the cache.
    pub fn skip_read(&self) -> bool {
        self.skip_read
    }

    /// Skip writing the response to the cache.
    pub fn skip_write(&self) -> bool {
        self.skip_write
    }

    /// Conditional request headers to attach when revalidating.
    pub fn validation_headers(&self) -> &HeaderMap {
        &self.validation_headers
    }
}
