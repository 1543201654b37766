use recache_backend::BackendError;
use thiserror::Error;

/// Boxed error type used at the transport boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage read/write/serialization failure.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The underlying HTTP client failed to produce a response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A request could not be constructed.
    #[error(transparent)]
    Http(#[from] http::Error),
}
