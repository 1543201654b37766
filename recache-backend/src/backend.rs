use std::sync::Arc;

use async_trait::async_trait;
use recache_core::CacheKey;

use crate::{BackendError, Format, JsonFormat};

/// Raw byte data type used for serialized cache entries.
pub type Raw = bytes::Bytes;

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Outcome of a remove operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The entry existed and was removed.
    Deleted,
    /// No entry was stored under the key.
    Missing,
}

/// A mapping-like store for serialized cache entries.
///
/// Implementations persist raw records keyed by [`CacheKey`], plus a
/// separate redirect index mapping the key of an intermediate redirect
/// to the key of the final response. Concurrent writes to the same key
/// may race; last-write-wins is acceptable.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the raw entry stored under a key.
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>>;

    /// Store a raw entry under a key, replacing any previous value.
    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()>;

    /// Remove the entry stored under a key.
    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// All keys with a stored entry.
    async fn keys(&self) -> BackendResult<Vec<CacheKey>>;

    /// Remove every entry and every redirect mapping.
    async fn clear(&self) -> BackendResult<()>;

    /// Resolve a redirect key to the key of its final response.
    async fn read_redirect(&self, key: &CacheKey) -> BackendResult<Option<CacheKey>>;

    /// Record that `key` redirects to the entry stored under `target`.
    async fn write_redirect(&self, key: &CacheKey, target: CacheKey) -> BackendResult<()>;

    /// The serializer used for entries in this backend.
    fn format(&self) -> &dyn Format {
        &JsonFormat
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn keys(&self) -> BackendResult<Vec<CacheKey>> {
        (**self).keys().await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }

    async fn read_redirect(&self, key: &CacheKey) -> BackendResult<Option<CacheKey>> {
        (**self).read_redirect(key).await
    }

    async fn write_redirect(&self, key: &CacheKey, target: CacheKey) -> BackendResult<()> {
        (**self).write_redirect(key, target).await
    }

    fn format(&self) -> &dyn Format {
        (**self).format()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn keys(&self) -> BackendResult<Vec<CacheKey>> {
        (**self).keys().await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }

    async fn read_redirect(&self, key: &CacheKey) -> BackendResult<Option<CacheKey>> {
        (**self).read_redirect(key).await
    }

    async fn write_redirect(&self, key: &CacheKey, target: CacheKey) -> BackendResult<()> {
        (**self).write_redirect(key, target).await
    }

    fn format(&self) -> &dyn Format {
        (**self).format()
    }
}
