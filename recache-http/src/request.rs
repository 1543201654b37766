use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};

/// A serialization-safe snapshot of an outgoing request.
///
/// Captures enough of the original request (method, URL, headers, body)
/// to reconstruct a new outgoing request later, e.g. to follow the next
/// hop of a redirect chain after deserialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CachedRequest {
    #[serde(with = "http_serde::method")]
    method: Method,
    url: String,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl CachedRequest {
    /// Snapshot a live request.
    pub fn from_request<B: AsRef<[u8]>>(request: &http::Request<B>) -> Self {
        CachedRequest {
            method: request.method().clone(),
            url: request.uri().to_string(),
            headers: request.headers().clone(),
            body: Bytes::copy_from_slice(request.body().as_ref()),
        }
    }

    /// Materialize a fresh outgoing request from the snapshot.
    ///
    /// Fails only if the stored URL no longer parses as a URI.
    pub fn prepare(&self) -> Result<http::Request<Bytes>, http::Error> {
        let uri = Uri::try_from(self.url.as_str())?;
        let mut request = http::Request::builder()
            .method(self.method.clone())
            .uri(uri)
            .body(self.body.clone())?;
        *request.headers_mut() = self.headers.clone();
        Ok(request)
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
