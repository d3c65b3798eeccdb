//! Unified error type for chat client operations.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::traits::HttpError;

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;

/// Unified error type for the chat client.
#[derive(Debug)]
pub enum ChatError {
    /// Missing, rejected, or unrefreshable credential.
    Auth(AuthError),

    /// The server answered successfully but had nothing usable to return.
    NotFound { resource: String },

    /// The server answered with a failure status, or with a payload that
    /// could not be understood.
    Application {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Transport failure or cancellation.
    Network(NetworkError),

    /// Failure while reading a streamed reply.
    Stream(StreamError),
}

impl ChatError {
    /// Failure status from the server.
    pub fn status(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        ChatError::Application {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Successful status but a payload that does not match the wire schema.
    pub fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        ChatError::Application {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Auth(_) => ErrorCategory::Auth,
            ChatError::NotFound { .. } => ErrorCategory::NotFound,
            ChatError::Application { .. } => ErrorCategory::Server,
            ChatError::Network(_) | ChatError::Stream(_) => ErrorCategory::Network,
        }
    }

    /// True when the operation stopped because its cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Network(NetworkError::Cancelled))
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Auth(err) => err.user_message(),
            ChatError::NotFound { resource } => format!("Unable to load {}.", resource),
            ChatError::Application { status, .. } => match status {
                Some(code) => format!("The request failed (HTTP {}). Please try again.", code),
                None => "The server sent a response that could not be read.".to_string(),
            },
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Auth(err) => err.error_code(),
            ChatError::NotFound { .. } => "E_NOT_FOUND",
            ChatError::Application { status: Some(_), .. } => "E_APP_STATUS",
            ChatError::Application { status: None, .. } => "E_APP_MALFORMED",
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Auth(err) => write!(f, "{}", err),
            ChatError::NotFound { resource } => write!(f, "Unable to load {}", resource),
            ChatError::Application {
                operation,
                status: Some(status),
                message,
            } => write!(f, "Error {} (HTTP {}): {}", operation, status, message),
            ChatError::Application {
                operation,
                status: None,
                message,
            } => write!(f, "Error {}: {}", operation, message),
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Auth(err) => Some(err),
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::NotFound { .. } | ChatError::Application { .. } => None,
        }
    }
}

impl From<AuthError> for ChatError {
    fn from(err: AuthError) -> Self {
        ChatError::Auth(err)
    }
}

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        ChatError::Network(err.into())
    }
}
