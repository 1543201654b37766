use async_trait::async_trait;
use recache_core::CacheKey;
use recache_http::CachedResponse;
use tracing::warn;

use crate::backend::{Backend, BackendResult, DeleteStatus};

/// Typed response operations layered over any [`Backend`].
///
/// Handles serialization, redirect-key resolution, and cache-key
/// stamping so callers work with [`CachedResponse`] values directly.
#[async_trait]
pub trait ResponseStore: Backend {
    /// Fetch and deserialize the response stored under a key.
    ///
    /// If the key is a recorded redirect hop, the final entry is
    /// returned instead. The resolved key is stamped onto the response.
    /// Records that no longer deserialize are dropped and treated as a
    /// miss.
    async fn get_response(&self, key: &CacheKey) -> BackendResult<Option<CachedResponse>> {
        let resolved = match self.read_redirect(key).await? {
            Some(target) => target,
            None => key.clone(),
        };
        let Some(raw) = self.read(&resolved).await? else {
            return Ok(None);
        };
        match self.format().deserialize(&raw) {
            Ok(mut response) => {
                response.set_cache_key(resolved);
                Ok(Some(response))
            }
            Err(error) => {
                warn!(key = %resolved, %error, "dropping unreadable cache entry");
                self.remove(&resolved).await?;
                Ok(None)
            }
        }
    }

    /// Serialize and store a response, indexing each redirect hop in
    /// its history so lookups on intermediate URLs find the final
    /// entry.
    async fn save_response(&self, response: &CachedResponse, key: &CacheKey) -> BackendResult<()> {
        let raw = self.format().serialize(response)?;
        self.write(key, raw).await?;
        for hop in response.history() {
            if let Ok(request) = hop.request().prepare() {
                let hop_key = CacheKey::from_request(&request);
                self.write_redirect(&hop_key, key.clone()).await?;
            }
        }
        Ok(())
    }

    /// Remove the response stored under a key.
    async fn delete_response(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        self.remove(key).await
    }
}

impl<T: Backend + ?Sized> ResponseStore for T {}
