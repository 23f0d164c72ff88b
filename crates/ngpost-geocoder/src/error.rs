use ngpost_core::ErrorKind;
use thiserror::Error;

/// Errors returned by the reverse-geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Rejected before any network access.
    #[error("coordinates ({lat}, {lng}) are outside Nigeria")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// The provider answered with a non-2xx status.
    #[error("geocoding provider returned HTTP {status}")]
    GeocodingFailed { status: u16 },

    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GeocodeError {
    /// Maps onto the shared error taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeocodeError::InvalidCoordinates { .. } => ErrorKind::InvalidCoordinates,
            GeocodeError::GeocodingFailed { .. } => ErrorKind::GeocodingFailed,
            GeocodeError::Http(_)
            | GeocodeError::Deserialize { .. }
            | GeocodeError::InvalidBaseUrl { .. } => ErrorKind::ServerError,
        }
    }
}
