use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use http::{Method, StatusCode};
use tracing::{debug, warn};

use recache_backend::{Backend, ResponseStore};
use recache_core::{CacheActions, CacheKey, RequestOverrides};
use recache_http::{CachedRequest, CachedResponse, LiveResponse};

use crate::config::SessionConfig;
use crate::error::Error;
use crate::response::SessionResponse;
use crate::transport::Transport;

/// An HTTP session that serves responses from a cache when possible.
///
/// Wraps a [`Transport`] and a [`Backend`] and runs one cache cycle per
/// request: resolve actions from the request, consult the cache, send
/// over the transport only when needed, and store the result according
/// to the resolved actions.
pub struct CachedSession<T, B> {
    transport: T,
    backend: B,
    config: SessionConfig,
    disabled: AtomicBool,
}

impl<T: Transport, B: Backend> CachedSession<T, B> {
    /// Create a session with default configuration.
    pub fn new(transport: T, backend: B) -> Self {
        Self::with_config(transport, backend, SessionConfig::default())
    }

    /// Create a session with the given configuration.
    pub fn with_config(transport: T, backend: B, config: SessionConfig) -> Self {
        CachedSession {
            transport,
            backend,
            config,
            disabled: AtomicBool::new(false),
        }
    }

    /// The cache backend this session stores responses in.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Temporarily bypass the cache for all requests. While disabled,
    /// requests go straight to the transport and nothing is read or
    /// written.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    /// Whether the cache is currently bypassed.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Send a `GET` request with no per-request overrides.
    pub async fn get(&self, url: &str) -> Result<SessionResponse, Error> {
        let request = http::Request::builder()
            .method(Method::GET)
            .uri(url)
            .body(Bytes::new())?;
        self.send(request, &RequestOverrides::default()).await
    }

    /// Send a request, using and updating the cache as the resolved
    /// actions dictate.
    pub async fn send(
        &self,
        mut request: http::Request<Bytes>,
        overrides: &RequestOverrides,
    ) -> Result<SessionResponse, Error> {
        let cache_key = CacheKey::from_request(&request);
        if self.is_disabled() {
            let response = self
                .transport
                .send(request)
                .await
                .map_err(Error::Transport)?;
            return Ok(SessionResponse::Live {
                cache_key,
                response,
            });
        }

        let mut actions =
            CacheActions::from_request(cache_key, &mut request, &self.config.cache, overrides);
        let cached = if actions.skip_read() {
            None
        } else {
            self.backend.get_response(actions.cache_key()).await?
        };
        actions.update_from_cached_response(cached.as_ref());

        if actions.only_if_cached() && cached.as_ref().is_none_or(CachedResponse::is_expired) {
            debug!(cache_key = %actions.cache_key(), "cache-only request missed");
            let snapshot = CachedRequest::from_request(&request);
            return Ok(SessionResponse::Cached(CachedResponse::not_cached(
                snapshot,
            )));
        }

        match cached {
            None => self.send_and_cache(request, actions, None).await,
            Some(cached) if actions.revalidate() => {
                self.send_and_cache(request, actions, Some(cached)).await
            }
            Some(cached) if cached.is_expired() && self.config.stale_if_error => {
                self.resend_and_ignore(request, actions, cached).await
            }
            Some(cached) if cached.is_expired() => self.resend(request, actions, cached).await,
            Some(cached) => Ok(SessionResponse::Cached(cached)),
        }
    }

    /// Remove every entry from the cache backend.
    pub async fn clear(&self) -> Result<(), Error> {
        self.backend.clear().await?;
        Ok(())
    }

    /// Remove all expired entries, returning the number removed.
    pub async fn delete_expired(&self) -> Result<usize, Error> {
        let mut removed = 0;
        for key in self.backend.keys().await? {
            if let Some(response) = self.backend.get_response(&key).await?
                && response.is_expired()
            {
                self.backend.delete_response(&key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Send the request over the transport and store the response if
    /// the resolved actions permit.
    ///
    /// A `304 Not Modified` answer to a conditional request refreshes
    /// the existing cached entry instead of replacing it.
    async fn send_and_cache(
        &self,
        mut request: http::Request<Bytes>,
        mut actions: CacheActions,
        cached: Option<CachedResponse>,
    ) -> Result<SessionResponse, Error> {
        if actions.revalidate() {
            for (name, value) in actions.validation_headers() {
                request.headers_mut().insert(name.clone(), value.clone());
            }
        }
        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::Transport)?;
        actions.update_from_response(Some(&response));

        let cache_key = actions.cache_key().clone();
        if self.is_cacheable(&response, &actions) {
            let entry = CachedResponse::from_response(&response, actions.expires());
            self.backend.save_response(&entry, &cache_key).await?;
            return Ok(SessionResponse::Live {
                cache_key,
                response,
            });
        }
        if let Some(cached) = cached
            && response.status == StatusCode::NOT_MODIFIED
        {
            let updated = self
                .update_revalidated_response(actions, &response, cached)
                .await?;
            return Ok(SessionResponse::Cached(updated));
        }
        debug!(%cache_key, status = %response.status, "response not written to the cache");
        Ok(SessionResponse::Live {
            cache_key,
            response,
        })
    }

    /// Re-fetch a stale entry. If the transport fails, the stale entry
    /// is deleted before the error propagates.
    async fn resend(
        &self,
        request: http::Request<Bytes>,
        actions: CacheActions,
        cached: CachedResponse,
    ) -> Result<SessionResponse, Error> {
        let cache_key = actions.cache_key().clone();
        debug!(%cache_key, "stale cache entry; refreshing");
        match self.send_and_cache(request, actions, Some(cached)).await {
            Ok(response) => Ok(response),
            Err(error) => {
                self.backend.delete_response(&cache_key).await?;
                Err(error)
            }
        }
    }

    /// Re-fetch a stale entry, falling back to the stale response when
    /// the transport fails or answers with an error status.
    async fn resend_and_ignore(
        &self,
        request: http::Request<Bytes>,
        actions: CacheActions,
        cached: CachedResponse,
    ) -> Result<SessionResponse, Error> {
        let cache_key = actions.cache_key().clone();
        match self
            .send_and_cache(request, actions, Some(cached.clone()))
            .await
        {
            Ok(response)
                if !response.status().is_client_error()
                    && !response.status().is_server_error() =>
            {
                Ok(response)
            }
            Ok(response) => {
                warn!(%cache_key, status = %response.status(), "refresh returned an error status; using stale cache entry");
                Ok(SessionResponse::Cached(cached))
            }
            Err(error) => {
                warn!(%cache_key, %error, "refresh failed; using stale cache entry");
                Ok(SessionResponse::Cached(cached))
            }
        }
    }

    /// Refresh a cached entry after a `304 Not Modified` answer: merge
    /// the new headers into the entry, re-resolve its expiration, and
    /// store it again.
    async fn update_revalidated_response(
        &self,
        mut actions: CacheActions,
        response: &LiveResponse,
        mut cached: CachedResponse,
    ) -> Result<CachedResponse, Error> {
        debug!(cache_key = %actions.cache_key(), "cached response revalidated");
        for (name, value) in &response.headers {
            cached.headers_mut().insert(name.clone(), value.clone());
        }
        actions.update_from_response(Some(&cached));
        let mut updated = cached.restamp(actions.expires());
        self.backend.save_response(&updated, actions.cache_key()).await?;
        updated.set_cache_key(actions.cache_key().clone());
        Ok(updated)
    }

    fn is_cacheable(&self, response: &LiveResponse, actions: &CacheActions) -> bool {
        !self.is_disabled()
            && self
                .config
                .allowable_methods
                .contains(response.request.method())
            && self.config.allowable_codes.contains(&response.status)
            && !actions.skip_write()
    }
}
