//! Error types for the satscope-data crate.

use std::fmt;

use satscope_geodesy::GeodesyError;

/// Result type for satscope-data operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or loading satellite data.
#[derive(Debug)]
pub enum Error {
    /// An N2YO request was attempted without an API key.
    MissingApiKey,
    /// The HTTP client could not be constructed.
    ClientBuild {
        /// The error message.
        message: String,
    },
    /// HTTP request failed.
    Http {
        /// The URL that failed, with credentials redacted.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error, with credentials redacted.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// The API answered with an error message in its body.
    Api {
        /// The message reported by the API.
        message: String,
    },
    /// Invalid data in a response or file.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// Reading a local file failed.
    Io {
        /// The file path.
        path: String,
        /// The error message.
        message: String,
    },
    /// Coordinate conversion failed.
    Geodesy(GeodesyError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingApiKey => write!(f, "N2YO API key not set"),
            Error::ClientBuild { message } => {
                write!(f, "failed to create http client: {message}")
            }
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Api { message } => write!(f, "api error: {message}"),
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
            Error::Io { path, message } => {
                write!(f, "failed to read {path}: {message}")
            }
            Error::Geodesy(e) => write!(f, "coordinate error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Geodesy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeodesyError> for Error {
    fn from(e: GeodesyError) -> Self {
        Error::Geodesy(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidData {
            context: "json response",
            detail: e.to_string(),
        }
    }
}
