use thiserror::Error;

/// Caller-facing error taxonomy shared by every lookup surface.
///
/// Each crate keeps its own detailed error enum and maps it onto one of these
/// kinds at the boundary. The kind decides the wire code and HTTP status; the
/// detailed error is only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing request fields.
    InvalidInput,
    /// Coordinates outside the supported territory (or not finite).
    InvalidCoordinates,
    /// The upstream geocoder answered with a non-success status.
    GeocodingFailed,
    /// Transport or parse failure, or anything unexpected.
    ServerError,
}

impl ErrorKind {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidCoordinates => "invalid_coordinates",
            ErrorKind::GeocodingFailed => "geocoding_failed",
            ErrorKind::ServerError => "server_error",
        }
    }

    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::InvalidInput | ErrorKind::InvalidCoordinates => 400,
            ErrorKind::GeocodingFailed => 502,
            ErrorKind::ServerError => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors raised while loading the postal-code dataset.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read postal code table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse postal code table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported postal code table version {0}")]
    UnsupportedVersion(u32),

    #[error("postal code table is empty")]
    Empty,

    #[error("invalid postal code \"{postal_code}\" for {state}/{lga}: expected six digits")]
    InvalidPostalCode {
        state: String,
        lga: String,
        postal_code: String,
    },
}
