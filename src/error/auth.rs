//! Authentication-related error types.

use std::fmt;

/// Authentication failures.
///
/// None of these are retried: the single refresh-and-replay in the request
/// layer has already happened by the time one of them reaches the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No credential available, or the auth subsystem reports signed out.
    NotAuthenticated,

    /// The auth subsystem could not refresh the access token.
    RefreshFailed { message: String },

    /// The server rejected the request again after a successful refresh.
    RetryExhausted,
}

impl AuthError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::RefreshFailed { .. } => {
                "Failed to renew your session. Please sign in again.".to_string()
            }
            AuthError::RetryExhausted => {
                "Your session is no longer valid. Please sign in again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NONE",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH_FAIL",
            AuthError::RetryExhausted => "E_AUTH_REJECTED",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Authentication token not found"),
            AuthError::RefreshFailed { message } => {
                write!(f, "Token refresh failed: {}", message)
            }
            AuthError::RetryExhausted => {
                write!(f, "Request still unauthorized after token refresh")
            }
        }
    }
}

impl std::error::Error for AuthError {}
