use async_trait::async_trait;
use bytes::Bytes;
use recache_http::LiveResponse;

use crate::error::BoxError;

/// The HTTP client boundary.
///
/// A transport sends one prepared request and returns a
/// [`LiveResponse`] whose body has already been read and decoded.
/// The session never performs network I/O itself.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the live response.
    async fn send(&self, request: http::Request<Bytes>) -> Result<LiveResponse, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: http::Request<Bytes>) -> Result<LiveResponse, BoxError> {
        (**self).send(request).await
    }
}
