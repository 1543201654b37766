use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use recache_core::CacheKey;

use crate::backend::{Backend, BackendResult, DeleteStatus, Raw};

/// In-process backend over concurrent hash maps.
///
/// Entries and the redirect index live in separate maps. Suitable for
/// tests and short-lived sessions; nothing is persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: Arc<DashMap<CacheKey, Raw>>,
    redirects: Arc<DashMap<CacheKey, CacheKey>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, excluding redirect mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        self.entries.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        Ok(match self.entries.remove(key) {
            Some(_) => DeleteStatus::Deleted,
            None => DeleteStatus::Missing,
        })
    }

    async fn keys(&self) -> BackendResult<Vec<CacheKey>> {
        Ok(self.entries.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn clear(&self) -> BackendResult<()> {
        self.entries.clear();
        self.redirects.clear();
        Ok(())
    }

    async fn read_redirect(&self, key: &CacheKey) -> BackendResult<Option<CacheKey>> {
        Ok(self.redirects.get(key).map(|entry| entry.value().clone()))
    }

    async fn write_redirect(&self, key: &CacheKey, target: CacheKey) -> BackendResult<()> {
        self.redirects.insert(key.clone(), target);
        Ok(())
    }
}
