#![warn(missing_docs)]
//! # recache-core
//!
//! The cache policy engine of the recache HTTP caching toolkit.
//!
//! This crate is pure decision logic: given an outgoing request, cache
//! settings, and the headers of cached or fresh responses, it computes
//! which cache actions to take (read, write, revalidate, expire) without
//! performing any I/O itself. The session orchestrator in the `recache`
//! crate consumes these decisions and drives transport and storage.
//!
//! ## Precedence
//!
//! When several sources provide an expiration time, the first present
//! value wins, in this order:
//!
//! 1. `Cache-Control: max-age` request header
//! 2. `Cache-Control`/`Expires` response headers (when enabled)
//! 3. Per-request expiration
//! 4. Per-URL pattern expiration
//! 5. Session-wide expiration

pub mod actions;
pub mod cacheable;
pub mod directives;
pub mod expiration;
pub mod key;
pub mod pattern;
pub mod settings;

pub use actions::{CacheActions, REFRESH_HEADER};
pub use cacheable::{CachedEntry, HasHeaders};
pub use directives::{CacheDirectives, Directive, append_directive, split_kv_directive};
pub use expiration::{
    DO_NOT_CACHE, Expiration, NEVER_EXPIRE, get_expiration_datetime, get_expiration_seconds,
    parse_http_date,
};
pub use key::CacheKey;
pub use pattern::{UrlPatterns, url_match};
pub use settings::{CacheSettings, RequestOverrides};
