//! Cache key type.
//!
//! The policy engine treats keys as opaque identifiers; the only
//! construction helper here derives a key from an outgoing request.

use sha2::{Digest, Sha256};
use smol_str::SmolStr;
use std::fmt;

/// An opaque identifier for a stored cache entry.
///
/// Backed by [`SmolStr`], so short keys are stored inline and cloning
/// is cheap either way.
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CacheKey(SmolStr);

impl CacheKey {
    /// Derive a cache key from a request: `METHOD:url`, with a SHA-256
    /// digest of the body appended when the body is non-empty.
    pub fn from_request<B: AsRef<[u8]>>(request: &http::Request<B>) -> Self {
        let body = request.body().as_ref();
        let mut key = format!("{}:{}", request.method(), request.uri());
        if !body.is_empty() {
            let digest = Sha256::digest(body);
            key.push(':');
            key.push_str(&hex::encode(digest));
        }
        CacheKey(SmolStr::new(key))
    }

    /// View the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        CacheKey(SmolStr::new(key))
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        CacheKey(SmolStr::new(key))
    }
}
