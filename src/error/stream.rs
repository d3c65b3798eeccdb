//! Streaming-related error types.
//!
//! Failures that happen after a streamed reply has started arriving.

use std::fmt;

use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The transport failed while the body was being read.
    Transport { message: String },
}

impl StreamError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport { .. } => {
                "The connection was lost while the reply was arriving.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Transport { message } => {
                write!(f, "Stream interrupted: {}", message)
            }
        }
    }
}

impl std::error::Error for StreamError {}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        StreamError::Transport {
            message: err.to_string(),
        }
    }
}
