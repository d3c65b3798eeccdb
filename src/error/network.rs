//! Network-related error types.
//!
//! Transport failures that happen before the server produced a status, plus
//! caller-initiated cancellation.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { message: String },

    /// Request timed out.
    Timeout { message: String },

    /// The request URL could not be built or parsed.
    InvalidUrl { url: String },

    /// Request was cancelled through its cancellation token.
    Cancelled,

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            NetworkError::InvalidUrl { url } => format!("Invalid server address: {}", url),
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Cancelled => "E_NET_CANCELLED",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { message } => {
                write!(f, "Connection failed: {}", message)
            }
            NetworkError::Timeout { message } => write!(f, "Request timed out: {}", message),
            NetworkError::InvalidUrl { url } => write!(f, "Invalid URL: {}", url),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed { message },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::InvalidUrl(url) => NetworkError::InvalidUrl { url },
            HttpError::Io(message) | HttpError::Other(message) => {
                NetworkError::Other { message }
            }
        }
    }
}
