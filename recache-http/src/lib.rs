//! # recache-http
//!
//! The response model of the recache HTTP caching toolkit.
//!
//! [`CachedResponse`] mirrors a live HTTP response's observable surface
//! (status, headers, body, cookies, redirect chain, next request) from
//! serialization-safe state, adding cache metadata: creation time,
//! expiration, and staleness. [`LiveResponse`] is the live variant of
//! the same capability set, produced by transports; the policy engine
//! consumes either through the capability traits in `recache-core`.

mod request;
mod response;

pub use request::CachedRequest;
pub use response::{CachedResponse, Cookie, LiveResponse};
