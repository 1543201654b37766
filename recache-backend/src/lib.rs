//! # recache-backend
//!
//! Storage and serializer boundary for the recache HTTP caching
//! toolkit.
//!
//! [`Backend`] is the mapping-like persistence interface keyed by
//! [`recache_core::CacheKey`]: raw entry get/set/delete/iterate/clear
//! plus a separate redirect-key→final-key index. [`Format`] turns a
//! [`recache_http::CachedResponse`] into a storable byte record and
//! back; the only requirement is round-trip fidelity. [`ResponseStore`]
//! layers typed response operations over any backend.
//!
//! [`MemoryBackend`] is an in-process implementation used by tests and
//! as a default store.

mod backend;
mod error;
mod format;
mod memory;
mod store;

pub use backend::{Backend, BackendResult, DeleteStatus, Raw};
pub use error::BackendError;
pub use format::{Format, FormatError, JsonFormat};
pub use memory::MemoryBackend;
pub use store::ResponseStore;
