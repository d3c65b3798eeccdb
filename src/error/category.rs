//! Error category classification.
//!
//! Categories let the caller pick how to present a failure without matching
//! on every concrete variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout, cancellation).
    Network,

    /// Authentication errors. The user has to sign in again.
    Auth,

    /// The server answered with a failure status or an unusable payload.
    Server,

    /// The requested resource does not exist.
    NotFound,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::NotFound => "not_found",
        }
    }

    /// Returns a hint the UI can show next to the error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and try again.",
            ErrorCategory::Auth => "Please sign in again.",
            ErrorCategory::Server => "The service reported a problem. Try again later.",
            ErrorCategory::NotFound => "The conversation may have been deleted.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
