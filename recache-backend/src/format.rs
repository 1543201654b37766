//! Serializer boundary between cached responses and storable records.

use recache_http::CachedResponse;
use thiserror::Error;

use crate::backend::Raw;

/// Serialization or deserialization failure.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The response could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    /// The stored record could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Bidirectional transform between a [`CachedResponse`] and its stored
/// byte form. Implementations only need round-trip fidelity.
pub trait Format: Send + Sync {
    /// Serialize a response into a storable record.
    fn serialize(&self, response: &CachedResponse) -> Result<Raw, FormatError>;

    /// Deserialize a stored record back into a response.
    fn deserialize(&self, raw: &[u8]) -> Result<CachedResponse, FormatError>;

    /// Name of this format, for diagnostics.
    fn name(&self) -> &str {
        "format"
    }
}

/// JSON record format.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize(&self, response: &CachedResponse) -> Result<Raw, FormatError> {
        serde_json::to_vec(response)
            .map(Raw::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn deserialize(&self, raw: &[u8]) -> Result<CachedResponse, FormatError> {
        serde_json::from_slice(raw).map_err(|error| FormatError::Deserialize(Box::new(error)))
    }

    fn name(&self) -> &str {
        "json"
    }
}
