//! # recache
//!
//! HTTP response caching layered atop a pluggable HTTP client.
//!
//! [`CachedSession`] owns a [`Transport`] (the HTTP client boundary)
//! and a cache backend, and drives one cache cycle per request: the
//! policy engine in `recache-core` decides whether to read, write,
//! revalidate, or bypass; the response model in `recache-http` stores
//! and reproduces responses; the store in `recache-backend` persists
//! them.
//!
//! ```ignore
//! use recache::{CachedSession, MemoryBackend, RequestOverrides, SessionConfig};
//!
//! let session = CachedSession::with_config(
//!     my_transport,
//!     MemoryBackend::new(),
//!     SessionConfig::default().cache_control(true),
//! );
//! let response = session.get("https://example.com/api").await?;
//! assert!(!response.from_cache());
//! let response = session.get("https://example.com/api").await?;
//! assert!(response.from_cache());
//! ```

mod config;
mod error;
mod response;
mod session;
mod transport;

pub use config::SessionConfig;
pub use error::{BoxError, Error};
pub use response::SessionResponse;
pub use session::CachedSession;
pub use transport::Transport;

pub use recache_backend::{Backend, MemoryBackend, ResponseStore};
pub use recache_core::{
    CacheActions, CacheKey, CacheSettings, Expiration, RequestOverrides, UrlPatterns,
};
pub use recache_http::{CachedRequest, CachedResponse, LiveResponse};
